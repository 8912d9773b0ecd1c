//! Soft assertion over the rendered preview of a document card

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fields shown on a document card preview, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewField {
    Title,
    Scale,
    IssuanceDate,
    Type,
}

impl PreviewField {
    pub const ALL: [PreviewField; 4] = [
        PreviewField::Title,
        PreviewField::Scale,
        PreviewField::IssuanceDate,
        PreviewField::Type,
    ];

    /// Label the card renders in front of the value (`Scale: 1:100`); the title has none
    pub fn label(&self) -> Option<&'static str> {
        match self {
            PreviewField::Title => None,
            PreviewField::Scale => Some("Scale"),
            PreviewField::IssuanceDate => Some("Issuance Date"),
            PreviewField::Type => Some("Type"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PreviewField::Title => "title",
            PreviewField::Scale => "scale",
            PreviewField::IssuanceDate => "issuance date",
            PreviewField::Type => "type",
        }
    }
}

pub type PreviewFields = HashMap<PreviewField, String>;

/// Result of comparing a rendered preview against expected values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewVerdict {
    Match,
    Mismatch {
        field: PreviewField,
        observed: String,
        expected: String,
    },
    /// The expected field could not be observed on the card
    Missing { field: PreviewField },
}

impl PreviewVerdict {
    pub fn is_match(&self) -> bool {
        matches!(self, PreviewVerdict::Match)
    }

    /// Failure detail naming the offending field
    pub fn detail(&self) -> Option<String> {
        match self {
            PreviewVerdict::Match => None,
            PreviewVerdict::Mismatch {
                field,
                observed,
                expected,
            } => Some(format!(
                "{} mismatch: {:?} != {:?}",
                field.name(),
                observed,
                expected
            )),
            PreviewVerdict::Missing { field } => {
                Some(format!("{} missing from card preview", field.name()))
            }
        }
    }
}

/// Compare observed preview fields with expected ones.
///
/// Only fields present in `expected` are checked, in [`PreviewField::ALL`] order, with
/// exact string equality. The first mismatch decides the verdict.
pub fn verify_preview(rendered: &PreviewFields, expected: &PreviewFields) -> PreviewVerdict {
    for field in PreviewField::ALL {
        let Some(want) = expected.get(&field) else {
            continue;
        };
        match rendered.get(&field) {
            None => return PreviewVerdict::Missing { field },
            Some(got) if got != want => {
                return PreviewVerdict::Mismatch {
                    field,
                    observed: got.clone(),
                    expected: want.clone(),
                }
            }
            Some(_) => {}
        }
    }
    PreviewVerdict::Match
}

/// Extract the value of a `Label: value` preview line.
///
/// Splits on the first `": "`. Returns `None` when the line has no separator.
pub fn parse_labeled_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ")
        .map(|(label, value)| (label.trim(), value))
}

/// Collect preview fields from the title text and the card's labeled lines
pub fn collect_preview(title: Option<&str>, lines: &[String]) -> PreviewFields {
    let mut fields = PreviewFields::new();
    if let Some(title) = title {
        fields.insert(PreviewField::Title, title.to_string());
    }

    for line in lines {
        let Some((label, value)) = parse_labeled_line(line) else {
            continue;
        };
        if let Some(field) = PreviewField::ALL
            .into_iter()
            .find(|f| f.label() == Some(label))
        {
            fields.entry(field).or_insert_with(|| value.to_string());
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(PreviewField, &str)]) -> PreviewFields {
        pairs.iter().map(|(f, v)| (*f, v.to_string())).collect()
    }

    #[test]
    fn test_matching_preview() {
        let rendered = fields(&[(PreviewField::Title, "X"), (PreviewField::Scale, "1:100")]);
        let expected = rendered.clone();
        assert!(verify_preview(&rendered, &expected).is_match());
    }

    #[test]
    fn test_title_mismatch_is_reported() {
        let rendered = fields(&[(PreviewField::Title, "Y"), (PreviewField::Scale, "1:100")]);
        let expected = fields(&[(PreviewField::Title, "X"), (PreviewField::Scale, "1:100")]);

        let verdict = verify_preview(&rendered, &expected);
        assert!(!verdict.is_match());
        assert_eq!(
            verdict,
            PreviewVerdict::Mismatch {
                field: PreviewField::Title,
                observed: "Y".into(),
                expected: "X".into(),
            }
        );
        assert!(verdict.detail().unwrap().starts_with("title"));
    }

    #[test]
    fn test_comparison_is_exact() {
        let rendered = fields(&[(PreviewField::Type, "technical document")]);
        let expected = fields(&[(PreviewField::Type, "Technical document")]);
        assert!(!verify_preview(&rendered, &expected).is_match());

        let padded = fields(&[(PreviewField::Type, "Technical document ")]);
        assert!(!verify_preview(&padded, &expected).is_match());
    }

    #[test]
    fn test_missing_field() {
        let rendered = fields(&[(PreviewField::Title, "X")]);
        let expected = fields(&[(PreviewField::Title, "X"), (PreviewField::Scale, "1:100")]);
        assert_eq!(
            verify_preview(&rendered, &expected),
            PreviewVerdict::Missing {
                field: PreviewField::Scale
            }
        );
    }

    #[test]
    fn test_first_mismatch_wins() {
        let rendered = fields(&[(PreviewField::Scale, "a"), (PreviewField::Type, "b")]);
        let expected = fields(&[(PreviewField::Scale, "x"), (PreviewField::Type, "y")]);
        let verdict = verify_preview(&rendered, &expected);
        assert!(matches!(
            verdict,
            PreviewVerdict::Mismatch {
                field: PreviewField::Scale,
                ..
            }
        ));
        // Same inputs, same answer
        assert_eq!(verdict, verify_preview(&rendered, &expected));
    }

    #[test]
    fn test_collect_preview_from_lines() {
        let lines = vec![
            "Scale: 1:100".to_string(),
            "Issuance Date: 10/01/2022".to_string(),
            "Type: Technical document".to_string(),
            "Stakeholders Residents".to_string(),
        ];
        let collected = collect_preview(Some("New Card Title"), &lines);
        assert_eq!(collected[&PreviewField::Scale], "1:100");
        assert_eq!(collected[&PreviewField::IssuanceDate], "10/01/2022");
        assert_eq!(collected[&PreviewField::Type], "Technical document");
        assert_eq!(collected[&PreviewField::Title], "New Card Title");
    }

    #[test]
    fn test_parse_labeled_line() {
        assert_eq!(parse_labeled_line("Scale: 1:100"), Some(("Scale", "1:100")));
        assert_eq!(parse_labeled_line("no separator"), None);
    }
}

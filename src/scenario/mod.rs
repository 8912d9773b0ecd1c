//! The document card scenario: create a card, modify existing cards, link cards

pub mod interaction;
pub mod selectors;

use std::path::PathBuf;

use crate::driver::traits::Selector;
use crate::runner::preview::{PreviewField, PreviewFields};
use crate::runner::step::Step;
use crate::utils::config::Config;
use interaction::Interaction;

/// Values entered into the card form
#[derive(Debug, Clone, PartialEq)]
pub struct CardValues {
    pub title: String,
    pub stakeholders: Vec<String>,
    pub scale: String,
    /// Keystrokes for the date input (`MMDDYYYY`)
    pub issuance_date_keys: String,
    /// The same date as the card renders it
    pub issuance_date: String,
    pub doc_type: String,
    pub language: String,
    pub pages: String,
    pub latitude: String,
    pub longitude: String,
    pub description: String,
}

impl CardValues {
    pub fn new_card() -> Self {
        Self {
            title: "New Card Title".to_string(),
            stakeholders: vec!["Residents".to_string(), "Kiruna Municipality".to_string()],
            scale: "New Scale".to_string(),
            issuance_date_keys: "10012022".to_string(),
            issuance_date: "10/01/2022".to_string(),
            doc_type: "Technical document".to_string(),
            language: "Swedish".to_string(),
            pages: "100".to_string(),
            latitude: "60.1695".to_string(),
            longitude: "24.9354".to_string(),
            description: "Testing description for new card".to_string(),
        }
    }

    pub fn updated() -> Self {
        Self {
            title: "Updated Title".to_string(),
            scale: "Updated Scale".to_string(),
            description: "Testing description".to_string(),
            ..Self::new_card()
        }
    }

    /// What the card preview should show after saving these values
    pub fn expected_preview(&self) -> PreviewFields {
        [
            (PreviewField::Title, self.title.clone()),
            (PreviewField::Scale, self.scale.clone()),
            (PreviewField::IssuanceDate, self.issuance_date.clone()),
            (PreviewField::Type, self.doc_type.clone()),
        ]
        .into_iter()
        .collect()
    }
}

/// Step list builder for one run of the scenario
#[derive(Debug, Clone)]
pub struct DocumentCardScenario {
    pub target_url: String,
    pub timeout_ms: u64,
    pub settle_ms: u64,
    pub upload_files: Vec<PathBuf>,
    pub cards_to_modify: usize,
    pub max_links: usize,
    pub new_card: CardValues,
    pub updated_card: CardValues,
}

impl DocumentCardScenario {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_url: config.target_url.clone(),
            timeout_ms: config.default_timeout_ms,
            settle_ms: config.settle_delay_ms,
            upload_files: config.upload_files.clone(),
            cards_to_modify: config.cards_to_modify,
            max_links: config.max_links,
            new_card: CardValues::new_card(),
            updated_card: CardValues::updated(),
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        let mut steps = self.create_card_steps();
        for n in 0..self.cards_to_modify {
            steps.extend(self.modify_card_steps(n));
        }
        for n in 0..self.max_links {
            steps.extend(self.link_card_steps(n));
        }
        steps
    }

    fn wait(&self, selector: Selector) -> Interaction {
        Interaction::wait_for(selector, self.timeout_ms)
    }

    fn create_card_steps(&self) -> Vec<Step> {
        let mut steps = vec![
            Step::new(
                "Open target page",
                Interaction::Navigate(self.target_url.clone()),
            )
            .required(),
            Step::new(
                "Page root loaded",
                Interaction::Sequence(vec![
                    self.wait(selectors::app_root()),
                    Interaction::Pause(self.settle_ms),
                ]),
            )
            .required(),
            Step::new(
                "Open Documents page",
                Interaction::Sequence(vec![
                    self.wait(selectors::documents_nav()),
                    Interaction::Tap(selectors::documents_nav()),
                    Interaction::Pause(self.settle_ms),
                ]),
            )
            .required(),
            Step::new(
                "Document cards listed",
                self.wait(selectors::document_card()),
            )
            .required(),
            Step::new(
                "Click Add new card",
                Interaction::Sequence(vec![
                    self.wait(selectors::add_card_button()),
                    Interaction::Tap(selectors::add_card_button()),
                ]),
            )
            .required(),
            Step::new("Modal found", self.wait(selectors::modal())).required(),
        ];

        steps.extend(form_steps("", &self.new_card));
        if !self.upload_files.is_empty() {
            steps.push(Step::new(
                format!("Attach {} files", self.upload_files.len()),
                Interaction::Attach {
                    selector: selectors::form::files(),
                    files: self.upload_files.clone(),
                },
            ));
        }

        steps.push(Step::new("Click Save", Interaction::Tap(selectors::form::save())).required());
        steps.push(Step::new(
            "New card saved",
            Interaction::ConfirmSaved {
                timeout_ms: self.timeout_ms,
            },
        ));
        steps.push(Step::new(
            "Verify new card preview",
            Interaction::VerifyPreview {
                card: selectors::newest_card(),
                expected: self.new_card.expected_preview(),
            },
        ));
        steps
    }

    fn open_card_steps(&self, prefix: &str, card: &Selector) -> Vec<Step> {
        vec![
            Step::new(
                format!("{}Scroll card into view", prefix),
                Interaction::Sequence(vec![
                    Interaction::ScrollIntoView(card.clone()),
                    Interaction::Pause(500),
                ]),
            ),
            Step::new(
                format!("{}Open card", prefix),
                Interaction::Tap(card.clone()),
            ),
            Step::new(
                format!("{}Modal found", prefix),
                self.wait(selectors::modal()),
            ),
        ]
    }

    fn modify_card_steps(&self, n: usize) -> Vec<Step> {
        let prefix = format!("Card {}: ", n + 1);
        let card = selectors::nth_card(n);

        let mut steps = self.open_card_steps(&prefix, &card);
        steps.push(Step::new(
            format!("{}Click Modify", prefix),
            Interaction::Tap(selectors::form::modify()),
        ));
        steps.push(Step::new(
            format!("{}Remove stakeholders", prefix),
            Interaction::TapAll(selectors::form::remove_stakeholder()),
        ));
        steps.extend(form_steps(&prefix, &self.updated_card));
        steps.push(Step::new(
            format!("{}Click Save", prefix),
            Interaction::Tap(selectors::form::save()),
        ));
        steps.push(Step::new(
            format!("{}Card saved", prefix),
            Interaction::ConfirmSaved {
                timeout_ms: self.timeout_ms,
            },
        ));
        steps.push(Step::new(
            format!("{}Verify preview", prefix),
            Interaction::VerifyPreview {
                card,
                expected: self.updated_card.expected_preview(),
            },
        ));
        steps
    }

    fn link_card_steps(&self, n: usize) -> Vec<Step> {
        let prefix = format!("Link {}: ", n + 1);
        let card = selectors::nth_card(n);

        let mut steps = self.open_card_steps(&prefix, &card);
        steps.extend([
            Step::new(
                format!("{}Click Link to", prefix),
                Interaction::Tap(selectors::link::link_to()),
            ),
            Step::new(
                format!("{}Card selection modal found", prefix),
                self.wait(selectors::link::selection_modal()),
            ),
            Step::new(
                format!("{}Card not offered as its own target", prefix),
                Interaction::AssertNotOffered {
                    card,
                    candidates: selectors::link::candidates(),
                },
            ),
            Step::new(
                format!("{}Select a different card", prefix),
                Interaction::Tap(selectors::link::first_candidate()),
            ),
            Step::new(
                format!("{}Select link type", prefix),
                Interaction::select(selectors::link::link_type(), "Direct consequence"),
            ),
            Step::new(
                format!("{}Confirm the link", prefix),
                Interaction::Tap(selectors::link::confirm()),
            ),
            Step::new(
                format!("{}Press Link", prefix),
                Interaction::TapExpectingDialog(selectors::link::submit()),
            ),
            Step::new(
                format!("{}Accept the alert", prefix),
                Interaction::AcceptDialog {
                    timeout_ms: self.timeout_ms,
                },
            ),
        ]);
        steps
    }
}

/// One step per form field
fn form_steps(prefix: &str, values: &CardValues) -> Vec<Step> {
    use selectors::form;

    let fields = [
        ("Fill title", Interaction::fill(form::title(), &values.title)),
        (
            "Add stakeholders",
            Interaction::AddStakeholders(values.stakeholders.clone()),
        ),
        ("Fill scale", Interaction::fill(form::scale(), &values.scale)),
        (
            "Type issuance date",
            Interaction::type_text(form::issuance_date(), &values.issuance_date_keys),
        ),
        (
            "Select document type",
            Interaction::select(form::doc_type(), &values.doc_type),
        ),
        (
            "Fill language",
            Interaction::fill(form::language(), &values.language),
        ),
        (
            "Fill number of pages",
            Interaction::fill(form::pages(), &values.pages),
        ),
        (
            "Fill latitude",
            Interaction::fill(form::latitude(), &values.latitude),
        ),
        (
            "Fill longitude",
            Interaction::fill(form::longitude(), &values.longitude),
        ),
        (
            "Fill description",
            Interaction::fill(form::description(), &values.description),
        ),
    ];

    fields
        .into_iter()
        .map(|(name, interaction)| Step::new(format!("{}{}", prefix, name), interaction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockSession;
    use crate::runner::executor::ScenarioRunner;
    use crate::runner::run_log::{MemorySink, RunLog};

    fn scenario(cards_to_modify: usize, max_links: usize) -> DocumentCardScenario {
        let config = Config {
            settle_delay_ms: 0,
            cards_to_modify,
            max_links,
            ..Config::default()
        };
        DocumentCardScenario::from_config(&config)
    }

    fn names(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_create_flow_order() {
        let steps = scenario(0, 0).steps();
        let names = names(&steps);

        assert_eq!(names[0], "Open target page");
        assert_eq!(names[4], "Click Add new card");
        assert_eq!(names[6], "Fill title");
        assert_eq!(*names.last().unwrap(), "Verify new card preview");
        assert!(!names.iter().any(|n| n.starts_with("Attach")));

        let required: Vec<&str> = steps
            .iter()
            .filter(|s| s.is_required())
            .map(|s| s.name())
            .collect();
        assert_eq!(
            required,
            vec![
                "Open target page",
                "Page root loaded",
                "Open Documents page",
                "Document cards listed",
                "Click Add new card",
                "Modal found",
                "Click Save",
            ]
        );
    }

    #[test]
    fn test_configured_repetitions() {
        let base = scenario(0, 0).steps().len();
        let steps = scenario(2, 3).steps();

        let modify = steps.iter().filter(|s| s.name().starts_with("Card ")).count();
        let link = steps.iter().filter(|s| s.name().starts_with("Link ")).count();
        assert_eq!(modify, 2 * 18);
        assert_eq!(link, 3 * 11);
        assert_eq!(steps.len(), base + modify + link);
        assert!(names(&steps).contains(&"Link 3: Accept the alert"));
        // Only the creation flow can abort the run
        assert!(steps[base..].iter().all(|s| !s.is_required()));
    }

    #[test]
    fn test_upload_step_when_configured() {
        let mut scenario = scenario(0, 0);
        scenario.upload_files = vec![PathBuf::from("docs/plan.pdf")];
        assert!(names(&scenario.steps()).contains(&"Attach 1 files"));
    }

    #[test]
    fn test_updated_values_keep_unchanged_fields() {
        let updated = CardValues::updated();
        assert_eq!(updated.title, "Updated Title");
        assert_eq!(updated.doc_type, "Technical document");
        assert_eq!(
            updated.expected_preview()[&PreviewField::IssuanceDate],
            "10/01/2022"
        );
    }

    #[tokio::test]
    async fn test_create_flow_against_mock() {
        let card = selectors::newest_card();
        let session = MockSession::new()
            .with_text(&selectors::card_title(card.clone()), "New Card Title")
            .with_texts(
                &selectors::card_lines(card),
                &[
                    "Scale: New Scale",
                    "Issuance Date: 10/01/2022",
                    "Type: Technical document",
                ],
            );
        let handle = session.handle();
        let sink = MemorySink::new();
        let mut runner = ScenarioRunner::new(RunLog::new().with_sink(sink.clone()));

        let steps = scenario(0, 0).steps();
        let summary = runner.run(Box::new(session), &steps).await.unwrap();

        assert!(summary.is_clean(), "{:?}", summary.outcomes);
        assert_eq!(summary.total_steps as usize, steps.len());
        assert_eq!(handle.calls()[0], "navigate http://localhost:5173/");
        assert!(handle
            .calls()
            .contains(&"type[10012022] #formDocumentIssuanceDate".to_string()));
        assert_eq!(handle.close_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_modal_aborts_run() {
        let session = MockSession::new().missing(&selectors::modal());
        let handle = session.handle();
        let mut runner = ScenarioRunner::new(RunLog::new());

        let steps = scenario(1, 1).steps();
        let summary = runner.run(Box::new(session), &steps).await.unwrap();

        assert_eq!(summary.aborted_at, Some(5));
        assert_eq!(summary.total_steps, 6);
        assert!(!handle.calls().iter().any(|c| c.contains("formDocumentTitle")));
        assert_eq!(handle.close_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_card_list_aborts_before_the_form() {
        let session = MockSession::new().missing(&selectors::document_card());
        let handle = session.handle();
        let mut runner = ScenarioRunner::new(RunLog::new());

        let steps = scenario(1, 1).steps();
        let summary = runner.run(Box::new(session), &steps).await.unwrap();

        assert_eq!(summary.aborted_at, Some(3));
        assert_eq!(summary.total_steps, 4);
        assert_eq!(summary.outcomes[3].name, "Document cards listed");
        assert!(!handle
            .calls()
            .iter()
            .any(|c| c.contains(&selectors::add_card_button().to_string())));
        assert_eq!(handle.close_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_field_does_not_stop_the_form() {
        let session = MockSession::new().failing(&selectors::form::scale());
        let mut runner = ScenarioRunner::new(RunLog::new());

        let steps = scenario(0, 0).steps();
        let summary = runner.run(Box::new(session), &steps).await.unwrap();

        let scale = summary
            .outcomes
            .iter()
            .find(|o| o.name == "Fill scale")
            .unwrap();
        assert!(!scale.succeeded);
        assert!(summary
            .outcomes
            .iter()
            .any(|o| o.name == "Fill description" && o.succeeded));
        assert!(!summary.is_aborted());
    }
}

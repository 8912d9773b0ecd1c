use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::driver::traits::{Selector, Session};
use crate::runner::preview::{collect_preview, verify_preview, PreviewFields};
use crate::runner::step::Action;

use super::selectors;

/// One UI interaction, described as data
#[derive(Debug, Clone)]
pub enum Interaction {
    Navigate(String),

    /// Wait for an element to be present
    WaitFor {
        selector: Selector,
        timeout_ms: u64,
    },

    Tap(Selector),

    /// Replace the value of an input
    Fill {
        selector: Selector,
        text: String,
    },

    /// Type key by key, for inputs that only react to key events
    Type {
        selector: Selector,
        text: String,
    },

    Select {
        selector: Selector,
        label: String,
    },

    Attach {
        selector: Selector,
        files: Vec<PathBuf>,
    },

    ScrollIntoView(Selector),

    /// Let the page settle
    Pause(u64),

    /// Run interactions in order, stopping at the first failure
    Sequence(Vec<Interaction>),

    /// Click "Add Stakeholder" once per name and fill the input it creates
    AddStakeholders(Vec<String>),

    /// Click every element matching the selector, first match each time
    TapAll(Selector),

    /// After Save: the Save button must disappear, otherwise the form is closed
    ConfirmSaved {
        timeout_ms: u64,
    },

    /// Soft assertion over a card's rendered preview
    VerifyPreview {
        card: Selector,
        expected: PreviewFields,
    },

    /// The opened card must not be offered as its own link target
    AssertNotOffered {
        card: Selector,
        candidates: Selector,
    },

    /// Click an element that opens a browser dialog
    TapExpectingDialog(Selector),

    AcceptDialog {
        timeout_ms: u64,
    },
}

impl Interaction {
    pub fn wait_for(selector: Selector, timeout_ms: u64) -> Self {
        Interaction::WaitFor {
            selector,
            timeout_ms,
        }
    }

    pub fn fill(selector: Selector, text: &str) -> Self {
        Interaction::Fill {
            selector,
            text: text.to_string(),
        }
    }

    pub fn type_text(selector: Selector, text: &str) -> Self {
        Interaction::Type {
            selector,
            text: text.to_string(),
        }
    }

    pub fn select(selector: Selector, label: &str) -> Self {
        Interaction::Select {
            selector,
            label: label.to_string(),
        }
    }
}

#[async_trait]
impl Action for Interaction {
    async fn perform(&self, session: &dyn Session) -> Result<()> {
        match self {
            Interaction::Navigate(url) => session.navigate(url).await,
            Interaction::WaitFor {
                selector,
                timeout_ms,
            } => {
                if !session.wait_for_element(selector, *timeout_ms).await? {
                    anyhow::bail!("Timed out after {}ms waiting for {}", timeout_ms, selector);
                }
                Ok(())
            }
            Interaction::Tap(selector) => session.tap(selector).await,
            Interaction::Fill { selector, text } => session.fill(selector, text).await,
            Interaction::Type { selector, text } => session.type_text(selector, text).await,
            Interaction::Select { selector, label } => {
                session.select_option(selector, label).await
            }
            Interaction::Attach { selector, files } => {
                session.attach_files(selector, files).await
            }
            Interaction::ScrollIntoView(selector) => session.scroll_into_view(selector).await,
            Interaction::Pause(ms) => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(())
            }
            Interaction::Sequence(items) => {
                for item in items {
                    item.perform(session).await?;
                }
                Ok(())
            }
            Interaction::AddStakeholders(names) => {
                let button = selectors::form::add_stakeholder();
                let input = selectors::form::newest_stakeholder();
                for name in names {
                    session.tap(&button).await?;
                    session
                        .fill(&input, name)
                        .await
                        .with_context(|| format!("Could not enter stakeholder '{}'", name))?;
                }
                Ok(())
            }
            Interaction::TapAll(selector) => {
                let count = session.element_texts(selector).await?.len();
                let first = first_of(selector);
                for _ in 0..count {
                    session.tap(&first).await?;
                }
                log::debug!("removed {} elements matching {}", count, selector);
                Ok(())
            }
            Interaction::ConfirmSaved { timeout_ms } => {
                let save = selectors::form::save();
                if session.wait_for_absence(&save, *timeout_ms).await? {
                    return Ok(());
                }
                if let Err(e) = session.tap(&selectors::form::close()).await {
                    log::warn!("could not close the unsaved form: {}", e);
                }
                anyhow::bail!("Save button still present after clicking")
            }
            Interaction::VerifyPreview { card, expected } => {
                let title = session
                    .get_element_text(&selectors::card_title(card.clone()))
                    .await
                    .ok();
                let lines = session
                    .element_texts(&selectors::card_lines(card.clone()))
                    .await?;
                let rendered = collect_preview(title.as_deref(), &lines);

                let verdict = verify_preview(&rendered, expected);
                match verdict.detail() {
                    None => Ok(()),
                    Some(detail) => anyhow::bail!("{}", detail),
                }
            }
            Interaction::AssertNotOffered { card, candidates } => {
                let opened = session.get_element_text(card).await?;
                let offered = session.element_texts(candidates).await?;
                if offered.iter().any(|text| *text == opened) {
                    anyhow::bail!("Cannot link to the same card");
                }
                if offered.is_empty() {
                    anyhow::bail!("No cards offered for linking");
                }
                Ok(())
            }
            Interaction::TapExpectingDialog(selector) => {
                session.arm_dialog_capture().await?;
                session.tap(selector).await
            }
            Interaction::AcceptDialog { timeout_ms } => {
                let message = session.accept_dialog(*timeout_ms).await?;
                log::info!("accepted dialog: {}", message);
                Ok(())
            }
        }
    }
}

/// First element of a selector that may match several
fn first_of(selector: &Selector) -> Selector {
    match selector {
        Selector::Id(id, _) => Selector::Id(id.clone(), 0),
        Selector::Class(name, _) => Selector::Class(name.clone(), 0),
        Selector::Button(label, _) => Selector::Button(label.clone(), 0),
        Selector::Css(css) => Selector::Css(format!("{} >> nth=0", css)),
        Selector::XPath(xpath) => Selector::XPath(format!("({})[1]", xpath)),
        Selector::Last(_) => selector.clone(),
        Selector::Within { parent, child } => first_of(child).within((**parent).clone()),
    }
}

//! Scripted session for unit tests

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::traits::{Selector, Session};

/// Shared view of what a [`MockSession`] saw, readable after the runner consumed the session
#[derive(Clone, Default)]
pub struct MockHandle {
    calls: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
}

impl MockHandle {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[derive(Default)]
pub struct MockSession {
    handle: MockHandle,
    not_ready: bool,
    fail_close: bool,
    failing: HashSet<String>,
    missing: HashSet<String>,
    lingering: HashSet<String>,
    texts: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    dialog: Option<String>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MockHandle {
        self.handle.clone()
    }

    pub fn not_ready(mut self) -> Self {
        self.not_ready = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Every interaction with this selector fails
    pub fn failing(mut self, selector: &Selector) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    /// Waits for this selector time out
    pub fn missing(mut self, selector: &Selector) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    /// Waits for this selector to disappear time out
    pub fn lingering(mut self, selector: &Selector) -> Self {
        self.lingering.insert(selector.to_string());
        self
    }

    pub fn with_text(mut self, selector: &Selector, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn with_texts(mut self, selector: &Selector, texts: &[&str]) -> Self {
        self.lists.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_dialog(mut self, message: &str) -> Self {
        self.dialog = Some(message.to_string());
        self
    }

    fn interact(&self, verb: &str, selector: &Selector) -> Result<()> {
        self.handle.record(format!("{} {}", verb, selector));
        if self.failing.contains(&selector.to_string()) {
            anyhow::bail!("Element not found: {}", selector);
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MockSession {
    fn platform_name(&self) -> &str {
        "mock"
    }

    fn is_ready(&self) -> bool {
        !self.not_ready
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.handle.record(format!("navigate {}", url));
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok("Mock".to_string())
    }

    async fn tap(&self, selector: &Selector) -> Result<()> {
        self.interact("tap", selector)
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        self.interact(&format!("fill[{}]", text), selector)
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> Result<()> {
        self.interact(&format!("type[{}]", text), selector)
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> Result<()> {
        self.interact(&format!("select[{}]", label), selector)
    }

    async fn attach_files(&self, selector: &Selector, paths: &[PathBuf]) -> Result<()> {
        self.interact(&format!("attach[{}]", paths.len()), selector)
    }

    async fn scroll_into_view(&self, selector: &Selector) -> Result<()> {
        self.interact("scroll", selector)
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        Ok(!self.missing.contains(&selector.to_string()))
    }

    async fn wait_for_element(&self, selector: &Selector, _timeout_ms: u64) -> Result<bool> {
        self.handle.record(format!("wait {}", selector));
        Ok(!self.missing.contains(&selector.to_string()))
    }

    async fn wait_for_absence(&self, selector: &Selector, _timeout_ms: u64) -> Result<bool> {
        self.handle.record(format!("wait-gone {}", selector));
        Ok(!self.lingering.contains(&selector.to_string()))
    }

    async fn get_element_text(&self, selector: &Selector) -> Result<String> {
        self.interact("read", selector)?;
        self.texts
            .get(&selector.to_string())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Element not found: {}", selector))
    }

    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>> {
        self.interact("read-all", selector)?;
        Ok(self
            .lists
            .get(&selector.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn arm_dialog_capture(&self) -> Result<()> {
        self.handle.record("arm-dialog".to_string());
        Ok(())
    }

    async fn accept_dialog(&self, timeout_ms: u64) -> Result<String> {
        self.handle.record("accept-dialog".to_string());
        self.dialog
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No dialog appeared within {}ms", timeout_ms))
    }

    async fn take_screenshot(&self, path: &str) -> Result<()> {
        self.handle.record(format!("screenshot {}", path));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.handle.closes.fetch_add(1, Ordering::SeqCst);
        self.handle.record("close".to_string());
        if self.fail_close {
            anyhow::bail!("browser already gone");
        }
        Ok(())
    }
}

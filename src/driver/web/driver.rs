//! Web session implementation using Playwright
//!
//! Drives a single browser page for the whole scenario run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use playwright::api::{Browser, BrowserContext, Page, Viewport};
use playwright::Playwright;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::driver::traits::{Selector, Session};
use crate::utils::config::Config;
use colored::Colorize;

/// Web browser type
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "firefox" => BrowserType::Firefox,
            "webkit" | "safari" => BrowserType::Webkit,
            _ => BrowserType::Chromium,
        }
    }
}

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Browser executable; discovered when not set
    pub executable: Option<PathBuf>,
    /// Timeout for navigations and for actions that wait on their target
    pub action_timeout_ms: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            browser_type: BrowserType::Chromium,
            headless: false,
            viewport_width: 1280,
            viewport_height: 720,
            executable: None,
            action_timeout_ms: 10_000,
        }
    }
}

impl WebDriverConfig {
    /// Playwright timeout for navigations, clicks, fills and element lookups
    pub fn action_timeout(&self) -> f64 {
        self.action_timeout_ms as f64
    }
}

impl From<&Config> for WebDriverConfig {
    fn from(config: &Config) -> Self {
        Self {
            browser_type: BrowserType::from_name(&config.browser),
            headless: config.headless,
            executable: config.driver_path.clone(),
            action_timeout_ms: config.default_timeout_ms,
            ..Self::default()
        }
    }
}

/// Web session backed by a Playwright-controlled browser
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
    config: WebDriverConfig,
    ready: AtomicBool,
}

impl WebDriver {
    /// Launch a browser and open a blank page
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let browser = match config.browser_type {
            BrowserType::Chromium => launch_chromium_browser(&playwright.chromium(), &config).await?,
            BrowserType::Firefox => {
                playwright
                    .firefox()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
            BrowserType::Webkit => {
                playwright
                    .webkit()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
        };

        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
            config,
            ready: AtomicBool::new(true),
        })
    }

    /// Convert Selector to Playwright selector string
    fn selector_to_playwright(&self, selector: &Selector) -> String {
        to_playwright(selector)
    }

    async fn require_element(
        &self,
        page: &Page,
        selector: &Selector,
    ) -> Result<playwright::api::ElementHandle> {
        let sel = self.selector_to_playwright(selector);
        page.wait_for_selector_builder(&sel)
            .timeout(self.config.action_timeout())
            .wait_for_selector()
            .await
            .map_err(|e| anyhow::anyhow!("Element not found: {}: {:?}", selector, e))?
            .ok_or_else(|| anyhow::anyhow!("Element not found: {}", selector))
    }
}

/// Translate a [`Selector`] into Playwright's selector engine syntax
pub(crate) fn to_playwright(selector: &Selector) -> String {
    match selector {
        Selector::Id(id, index) => {
            if *index == 0 {
                format!("#{}", id)
            } else {
                format!("[id=\"{}\"] >> nth={}", id, index)
            }
        }
        Selector::Class(name, index) => {
            if *index == 0 {
                format!(".{}", name)
            } else {
                format!(".{} >> nth={}", name, index)
            }
        }
        Selector::Button(label, index) => {
            if *index == 0 {
                format!("button:has-text(\"{}\")", label)
            } else {
                format!("button:has-text(\"{}\") >> nth={}", label, index)
            }
        }
        Selector::Css(css) => css.clone(),
        Selector::XPath(xpath) => format!("xpath={}", xpath),
        Selector::Last(inner) => format!("{} >> nth=-1", to_playwright(inner)),
        Selector::Within { parent, child } => {
            format!("{} >> {}", to_playwright(parent), to_playwright(child))
        }
    }
}

#[async_trait]
impl Session for WebDriver {
    fn platform_name(&self) -> &str {
        "web"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .timeout(self.config.action_timeout())
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.title().await?)
    }

    async fn tap(&self, selector: &Selector) -> Result<()> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);
        log::debug!("click {}", sel);
        page.click_builder(&sel)
            .timeout(self.config.action_timeout())
            .click()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to click {}: {:?}", selector, e))?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);
        log::debug!("fill {} <- {:?}", sel, text);
        page.fill_builder(&sel, text)
            .timeout(self.config.action_timeout())
            .fill()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fill {}: {:?}", selector, e))?;
        Ok(())
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> Result<()> {
        let page = self.page.lock().await;
        let el = self.require_element(&page, selector).await?;
        el.click_builder()
            .timeout(self.config.action_timeout())
            .click()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to click {}: {:?}", selector, e))?;

        for ch in text.chars() {
            let key = ch.to_string();
            page.keyboard.down(&key).await?;
            page.keyboard.up(&key).await?;
        }
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, label: &str) -> Result<()> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);

        let js = r#"
            (el, label) => {
                const option = Array.from(el.options || [])
                    .find(o => o.text.trim() === label || o.value === label);
                if (!option) return false;
                el.value = option.value;
                el.dispatchEvent(new Event('input', { bubbles: true }));
                el.dispatchEvent(new Event('change', { bubbles: true }));
                return true;
            }
        "#;

        let selected: bool = page
            .evaluate_on_selector::<String, bool>(&sel, js, Some(label.to_string()))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to select on {}: {:?}", selector, e))?;

        if !selected {
            anyhow::bail!("Option '{}' not found in {}", label, selector);
        }
        Ok(())
    }

    async fn attach_files(&self, selector: &Selector, paths: &[PathBuf]) -> Result<()> {
        let mut payload = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read upload file {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "upload".to_string());
            payload.push(serde_json::json!({
                "name": name,
                "mime": guess_mime(path),
                "data": base64::engine::general_purpose::STANDARD.encode(bytes),
            }));
        }

        let js = r#"
            (el, files) => {
                const transfer = new DataTransfer();
                for (const f of files) {
                    const bytes = Uint8Array.from(atob(f.data), c => c.charCodeAt(0));
                    transfer.items.add(new File([bytes], f.name, { type: f.mime }));
                }
                el.files = transfer.files;
                el.dispatchEvent(new Event('change', { bubbles: true }));
                return el.files.length;
            }
        "#;

        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);
        let attached: usize = page
            .evaluate_on_selector::<serde_json::Value, usize>(
                &sel,
                js,
                Some(serde_json::Value::Array(payload)),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to attach files to {}: {:?}", selector, e))?;

        if attached != paths.len() {
            anyhow::bail!("Attached {} of {} files", attached, paths.len());
        }
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &Selector) -> Result<()> {
        let page = self.page.lock().await;
        let el = self.require_element(&page, selector).await?;
        el.scroll_into_view_if_needed(None).await?;
        Ok(())
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);
        match page.query_selector(&sel).await? {
            Some(el) => Ok(el.is_visible().await?),
            None => Ok(false),
        }
    }

    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);

        let result = page
            .wait_for_selector_builder(&sel)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;

        Ok(result.is_ok())
    }

    async fn wait_for_absence(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        let start = std::time::Instant::now();

        while start.elapsed().as_millis() < timeout_ms as u128 {
            if !self.is_visible(selector).await? {
                return Ok(true);
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        }

        Ok(false)
    }

    async fn get_element_text(&self, selector: &Selector) -> Result<String> {
        let page = self.page.lock().await;
        let el = self.require_element(&page, selector).await?;
        Ok(el.inner_text().await?)
    }

    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>> {
        let page = self.page.lock().await;
        let sel = self.selector_to_playwright(selector);
        let elements = page.query_selector_all(&sel).await?;

        let mut texts = Vec::with_capacity(elements.len());
        for el in elements {
            texts.push(el.inner_text().await?);
        }
        Ok(texts)
    }

    async fn arm_dialog_capture(&self) -> Result<()> {
        // Playwright dismisses dialogs nobody listens for, so record them in the page instead
        let js = r#"
            () => {
                window.__kirunaDialogs = [];
                window.alert = (message) => { window.__kirunaDialogs.push(String(message ?? '')); };
                window.confirm = (message) => { window.__kirunaDialogs.push(String(message ?? '')); return true; };
                return true;
            }
        "#;
        let page = self.page.lock().await;
        page.evaluate::<(), bool>(js, ()).await?;
        Ok(())
    }

    async fn accept_dialog(&self, timeout_ms: u64) -> Result<String> {
        let js = "() => (window.__kirunaDialogs || []).shift() ?? null";
        let start = std::time::Instant::now();

        while start.elapsed().as_millis() < timeout_ms as u128 {
            {
                let page = self.page.lock().await;
                if let Some(message) = page.evaluate::<(), Option<String>>(js, ()).await? {
                    return Ok(message);
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
        }

        anyhow::bail!("No dialog appeared within {}ms", timeout_ms)
    }

    async fn take_screenshot(&self, path: &str) -> Result<()> {
        let page = self.page.lock().await;
        let path_buf = PathBuf::from(path);

        if let Some(parent) = path_buf.parent() {
            std::fs::create_dir_all(parent)?;
        }

        page.screenshot_builder()
            .path(path_buf)
            .screenshot()
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.ready.store(false, Ordering::SeqCst);
        self.browser
            .close()
            .await
            .context("Failed to close browser")?;
        Ok(())
    }
}

fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Launch a new Chromium browser, preferring a configured or discovered executable
async fn launch_chromium_browser(
    chromium: &playwright::api::BrowserType,
    config: &WebDriverConfig,
) -> Result<Browser> {
    let mut launcher = chromium.launcher();
    launcher = launcher.headless(config.headless);

    let executable = match config.executable {
        Some(ref path) => Some(crate::utils::binary_resolver::resolve_browser(path)?),
        None => crate::utils::binary_resolver::find_browser(),
    };

    if let Some(ref path) = executable {
        println!("{} Using browser: {}", "🌐".blue(), path.display());
        launcher = launcher.executable(path);
    } else {
        println!(
            "{} No browser executable found. Falling back to Playwright's bundled Chromium",
            "ℹ".blue()
        );
    }

    let args: Vec<String> = vec![
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    launcher = launcher.args(&args);

    Ok(launcher.launch().await?)
}

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Element selector for UI elements
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Select by element id with index (several inputs share an id in the card form)
    Id(String, usize),
    /// Select by CSS class name with index
    Class(String, usize),
    /// Select a button whose label contains the given text, with index
    Button(String, usize),
    /// Select by CSS selector
    Css(String),
    /// Select by XPath
    XPath(String),
    /// Last element matched by the inner selector
    Last(Box<Selector>),
    /// Child selector scoped to a parent element
    Within {
        parent: Box<Selector>,
        child: Box<Selector>,
    },
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string(), 0)
    }

    pub fn class(name: &str) -> Self {
        Selector::Class(name.to_string(), 0)
    }

    pub fn button(label: &str) -> Self {
        Selector::Button(label.to_string(), 0)
    }

    pub fn css(css: &str) -> Self {
        Selector::Css(css.to_string())
    }

    pub fn xpath(xpath: &str) -> Self {
        Selector::XPath(xpath.to_string())
    }

    pub fn last(self) -> Self {
        Selector::Last(Box::new(self))
    }

    pub fn within(self, parent: Selector) -> Self {
        Selector::Within {
            parent: Box::new(parent),
            child: Box::new(self),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Id(id, 0) => write!(f, "#{}", id),
            Selector::Id(id, index) => write!(f, "#{}[{}]", id, index),
            Selector::Class(name, 0) => write!(f, ".{}", name),
            Selector::Class(name, index) => write!(f, ".{}[{}]", name, index),
            Selector::Button(label, 0) => write!(f, "button '{}'", label),
            Selector::Button(label, index) => write!(f, "button '{}'[{}]", label, index),
            Selector::Css(css) => write!(f, "{}", css),
            Selector::XPath(xpath) => write!(f, "{}", xpath),
            Selector::Last(inner) => write!(f, "last {}", inner),
            Selector::Within { parent, child } => write!(f, "{} in {}", child, parent),
        }
    }
}

/// Live connection to the application under test.
///
/// The runner owns a session for the whole run and releases it exactly once through
/// [`Session::close`]. Every interaction either completes or returns an error; waits
/// report a timeout as `Ok(false)` so callers decide whether that is a failure.
#[async_trait]
pub trait Session: Send + Sync {
    /// Get the platform name (e.g. "web")
    fn platform_name(&self) -> &str;

    /// Whether the session was established and can accept interactions
    fn is_ready(&self) -> bool;

    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Title of the current page
    async fn title(&self) -> Result<String>;

    /// Click on an element
    async fn tap(&self, selector: &Selector) -> Result<()>;

    /// Replace the value of an input or textarea
    async fn fill(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Focus an element and type text key by key
    ///
    /// Used for inputs that only react to real key events, such as date fields.
    async fn type_text(&self, selector: &Selector, text: &str) -> Result<()>;

    /// Choose an option of a `<select>` by its visible label
    async fn select_option(&self, selector: &Selector, label: &str) -> Result<()>;

    /// Attach local files to a file input
    async fn attach_files(&self, selector: &Selector, paths: &[PathBuf]) -> Result<()>;

    /// Scroll an element into the viewport
    async fn scroll_into_view(&self, selector: &Selector) -> Result<()>;

    /// Check if an element is currently visible
    async fn is_visible(&self, selector: &Selector) -> Result<bool>;

    /// Wait for an element to be present
    ///
    /// # Returns
    /// True if the element appeared, false on timeout
    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool>;

    /// Wait for an element to disappear
    async fn wait_for_absence(&self, selector: &Selector, timeout_ms: u64) -> Result<bool>;

    /// Get the text content of an element
    async fn get_element_text(&self, selector: &Selector) -> Result<String>;

    /// Text content of every element matched by the selector, in document order
    async fn element_texts(&self, selector: &Selector) -> Result<Vec<String>>;

    /// Start capturing browser dialogs (alert/confirm) so they can be read later
    async fn arm_dialog_capture(&self) -> Result<()>;

    /// Wait for a captured dialog and accept it
    ///
    /// # Returns
    /// The dialog message
    async fn accept_dialog(&self, timeout_ms: u64) -> Result<String>;

    /// Take a screenshot
    async fn take_screenshot(&self, path: &str) -> Result<()>;

    /// Release the session. Called once per run by the runner.
    async fn close(&self) -> Result<()>;
}

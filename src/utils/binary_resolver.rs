use anyhow::Result;
use std::path::{Path, PathBuf};

/// Browser executables looked up on `PATH`, in order of preference
const BROWSER_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Well-known install locations checked after `PATH`
const BROWSER_PATHS: &[&str] = &[
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/snap/bin/chromium",
];

/// Resolve a configured browser location.
///
/// Accepts either a path to an executable or a bare program name looked up on `PATH`.
pub fn resolve_browser(configured: &Path) -> Result<PathBuf> {
    if configured.exists() {
        return Ok(configured.to_path_buf());
    }

    let is_bare_name = configured.components().count() == 1;
    if is_bare_name {
        if let Ok(path) = which::which(configured) {
            return Ok(path);
        }
    }

    Err(anyhow::anyhow!(
        "Browser executable '{}' not found (checked file system{})",
        configured.display(),
        if is_bare_name { " and PATH" } else { "" }
    ))
}

/// Find a browser when none is configured
///
/// Checks `PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH`, then `PATH`, then well-known install
/// locations. Returns `None` so the driver can fall back to its bundled browser.
pub fn find_browser() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
        .map(PathBuf::from)
        .filter(|p| p.exists())
    {
        log::debug!("browser from env: {}", path.display());
        return Some(path);
    }

    if let Some(path) = BROWSER_NAMES.iter().find_map(|name| which::which(name).ok()) {
        log::debug!("browser on PATH: {}", path.display());
        return Some(path);
    }

    let found = BROWSER_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf);

    #[cfg(target_os = "windows")]
    let found = found.or_else(|| {
        std::env::var_os("LOCALAPPDATA")
            .map(|dir| PathBuf::from(dir).join("Google/Chrome/Application/chrome.exe"))
            .filter(|p| p.exists())
    });

    if found.is_none() {
        log::debug!("no system browser found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_path_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("chrome");
        std::fs::write(&exe, b"").unwrap();
        assert_eq!(resolve_browser(&exe).unwrap(), exe);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = resolve_browser(Path::new("/nonexistent/dir/chrome")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/chrome"));
        assert!(!err.to_string().contains("PATH"));
    }

    #[test]
    fn test_unknown_bare_name_is_an_error() {
        let err = resolve_browser(Path::new("surely-not-a-browser-binary")).unwrap_err();
        assert!(err.to_string().contains("and PATH"));
    }
}

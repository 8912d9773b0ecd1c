#[cfg(test)]
pub mod mock;
pub mod traits;
pub mod web;

use anyhow::Result;

use crate::utils::config::Config;
use traits::Session;

/// Open a browser session for the configured browser
pub async fn connect(config: &Config) -> Result<Box<dyn Session>> {
    let web_config = web::WebDriverConfig::from(config);
    log::info!(
        "launching {:?} (headless: {})",
        web_config.browser_type,
        web_config.headless
    );
    Ok(Box::new(web::WebDriver::new(web_config).await?))
}

use crate::config::types::{BrowserConfig, Config, ExtractionProfile, HarvestConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_browser_config(&config.browser)?;
    validate_extraction_profile(&config.selectors)?;
    Ok(())
}

/// Validates crawl loop configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url has no host: '{}'",
            config.base_url
        )));
    }

    if config.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.enabled && !cfg!(feature = "browser") {
        return Err(ConfigError::Validation(
            "browser rendering requested but this build lacks the `browser` feature".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.window_width == 0 || config.window_height == 0 {
        return Err(ConfigError::Validation(format!(
            "window size must be non-zero, got {}x{}",
            config.window_width, config.window_height
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector list is non-empty and parses
fn validate_extraction_profile(profile: &ExtractionProfile) -> Result<(), ConfigError> {
    let lists = [
        ("containers", &profile.containers),
        ("author", &profile.author),
        ("date", &profile.date),
        ("content", &profile.content),
        ("next_page", &profile.next_page),
    ];

    for (name, selectors) in lists {
        if selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector list '{}' cannot be empty",
                name
            )));
        }

        for selector in selectors {
            compile_selector(selector)?;
        }
    }

    if profile.id_attribute.trim().is_empty() {
        return Err(ConfigError::Validation(
            "id_attribute cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses one CSS selector, mapping failures to a configuration error
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

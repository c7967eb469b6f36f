//! Shell configuration
//!
//! Read once at startup from the bundled `shell.json` resource.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::surface::SurfaceSettings;
use crate::Result;
use webshell_navigation::NavigationPolicy;

const DEFAULT_TITLE: &str = "WebShell";
const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// The single page the shell displays (whitespace is trimmed before use)
    pub app_url: String,
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,
    /// Capability flags for the embedded surface
    #[serde(default)]
    pub surface: SurfaceSettings,
    /// Extra origins allowed inside the shell; empty means no restriction
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Seconds before a page that never finishes is treated as failed; 0 disables
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: u64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_load_timeout() -> u64 {
    DEFAULT_LOAD_TIMEOUT_SECS
}

impl ShellConfig {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
            title: default_title(),
            surface: SurfaceSettings::default(),
            allowed_origins: Vec::new(),
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let target = self.target_url()?;
        self.navigation_policy_for(&target)?;
        Ok(())
    }

    /// The trimmed, parsed target URL.
    pub fn target_url(&self) -> Result<Url> {
        let trimmed = self.app_url.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Config("app_url cannot be empty".to_string()));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| CoreError::Config(format!("app_url {:?} is not a valid URL: {}", trimmed, e)))?;

        if url.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "app_url {:?} is not a navigable URL",
                trimmed
            )));
        }

        Ok(url)
    }

    pub fn navigation_policy(&self) -> Result<NavigationPolicy> {
        let target = self.target_url()?;
        self.navigation_policy_for(&target)
    }

    fn navigation_policy_for(&self, target: &Url) -> Result<NavigationPolicy> {
        Ok(NavigationPolicy::with_allowed_origins(
            target,
            &self.allowed_origins,
        )?)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        match self.load_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

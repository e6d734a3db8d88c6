use super::search::{SearchDepth, SearchRequest};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the Tavily API key
pub const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Environment variable holding the SMTP (app) password
pub const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "tavily-sss.toml";

// =============================================================================
// Search Configuration
// =============================================================================

/// Search API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// API key (overridden by `TAVILY_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Search endpoint URL
    pub endpoint: String,
    /// Results requested per query
    pub max_results: usize,
    /// Search depth
    pub search_depth: SearchDepth,
    /// Ask for full page text
    pub include_raw_content: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.tavily.com/search".to_string(),
            max_results: 5,
            search_depth: SearchDepth::Advanced,
            include_raw_content: true,
            timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    /// Key from the environment, falling back to the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    /// Request for `query` with these settings
    pub fn request(&self, query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            max_results: self.max_results,
            search_depth: self.search_depth,
            include_raw_content: self.include_raw_content,
        }
    }
}

// =============================================================================
// SMTP Configuration
// =============================================================================

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS (SMTPS, usually port 465)
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS (usually port 587)
    StartTls,
}

/// SMTP relay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Login name
    pub username: String,
    /// Sender address (defaults to `username`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Password (overridden by `SMTP_PASSWORD`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
            security: SmtpSecurity::Tls,
            username: "JDSDAutomated@gmail.com".to_string(),
            from: None,
            password: None,
        }
    }
}

impl SmtpConfig {
    /// Sender address used in the `From` header
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }

    /// Password from the environment, falling back to the config file
    pub fn resolve_password(&self) -> Option<String> {
        std::env::var(SMTP_PASSWORD_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .or_else(|| self.password.clone().filter(|p| !p.is_empty()))
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

/// Where saved pages go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for saved HTML pages
    pub directory: PathBuf,
    /// Open saved pages in the default browser
    pub open_browser: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("saved_html"),
            open_browser: true,
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub smtp: SmtpConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Default per-user config location (`<config_dir>/tavily-sss/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tavily-sss").join("config.toml"))
    }

    /// Find the config file to use, if any.
    ///
    /// An explicit path wins, then `./tavily-sss.toml`, then the per-user file.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        Self::default_path().filter(|p| p.is_file())
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicitly requested file must exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        match Self::locate(explicit) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a specific config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Write config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

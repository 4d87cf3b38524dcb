use crate::error::{PrDailyError, Result};
use crate::github::RepoSlug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const GITHUB_TOKEN_ENV: &str = "GH_PAT";
const GITHUB_USER_ENV: &str = "GH_USER";
const GITHUB_REPO_ENV: &str = "GH_REPO";
const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
const SLACK_WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub personal access token
    pub github_token: Option<String>,

    /// Report on this user instead of the token owner
    pub github_user: Option<String>,

    /// Restrict collection to a single repository
    pub github_repo: Option<RepoSlug>,

    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Google Generative Language API key
    pub google_api_key: Option<String>,

    /// Gemini model used to write the daily report
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Generative Language API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Incoming webhook the report is posted to
    pub slack_webhook_url: Option<String>,

    /// Where `collect` writes the JSON report
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Instruction template prepended to the report for Gemini
    #[serde(default = "default_prompt_path")]
    pub prompt_path: PathBuf,

    /// Where `generate` writes the narrative report
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrDailyError::config(format!(
                "Config file not found at: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the default config file, falling back to built-in defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PrDailyError::config("Could not determine home directory"))?;
        Ok(home.join(".config").join("pr-daily").join("config.toml"))
    }

    /// Write a default configuration file to `config_path`; refuses to replace one unless `force`
    pub fn create_default_at(config_path: &Path, force: bool) -> Result<Self> {
        if config_path.exists() && !force {
            return Err(PrDailyError::config(format!(
                "Config file already exists at: {} (use --force to overwrite)",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(config_path, toml_string)?;

        Ok(config)
    }

    /// Overlay environment variables on top of file settings
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay settings from an arbitrary variable lookup; empty values are ignored
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(GITHUB_TOKEN_ENV) {
            self.github_token = Some(token);
        }
        if let Some(user) = get(GITHUB_USER_ENV) {
            self.github_user = Some(user);
        }
        if let Some(repo) = get(GITHUB_REPO_ENV) {
            self.github_repo = Some(repo.parse()?);
        }
        if let Some(key) = get(GOOGLE_API_KEY_ENV) {
            self.google_api_key = Some(key);
        }
        if let Some(url) = get(SLACK_WEBHOOK_ENV) {
            self.slack_webhook_url = Some(url);
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("report_path", &self.report_path),
            ("prompt_path", &self.prompt_path),
            ("summary_path", &self.summary_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(PrDailyError::config(format!("{} must not be empty", name)));
            }
        }

        if self.github_api_url.is_empty() || self.gemini_api_url.is_empty() {
            return Err(PrDailyError::config("API base URLs must not be empty"));
        }

        if self.gemini_model.is_empty() {
            return Err(PrDailyError::config("gemini_model must not be empty"));
        }

        Ok(())
    }

    pub fn github_token(&self) -> Result<&str> {
        required(&self.github_token, "github_token", GITHUB_TOKEN_ENV)
    }

    pub fn google_api_key(&self) -> Result<&str> {
        required(&self.google_api_key, "google_api_key", GOOGLE_API_KEY_ENV)
    }

    pub fn slack_webhook_url(&self) -> Result<&str> {
        required(&self.slack_webhook_url, "slack_webhook_url", SLACK_WEBHOOK_ENV)
    }

    /// Copy of the config with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "********".to_string());
        Self {
            github_token: mask(&self.github_token),
            google_api_key: mask(&self.google_api_key),
            slack_webhook_url: mask(&self.slack_webhook_url),
            ..self.clone()
        }
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
    env: &'static str,
) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(PrDailyError::MissingConfig { name, env })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_user: None,
            github_repo: None,
            github_api_url: default_github_api_url(),
            google_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_api_url: default_gemini_api_url(),
            slack_webhook_url: None,
            report_path: default_report_path(),
            prompt_path: default_prompt_path(),
            summary_path: default_summary_path(),
        }
    }
}

// Serde default functions
fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_api_url() -> String {
    DEFAULT_GEMINI_API_URL.to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("pr-report.json")
}

fn default_prompt_path() -> PathBuf {
    PathBuf::from("prompts/daily-pr-report.md")
}

fn default_summary_path() -> PathBuf {
    PathBuf::from("daily-report.md")
}

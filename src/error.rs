use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pr-daily
#[derive(Error, Debug)]
pub enum PrDailyError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A credential or setting that the command needs is not set
    #[error("{name} is not set (set the {env} environment variable or add {name} to the config file)")]
    MissingConfig { name: &'static str, env: &'static str },

    /// A hand-off file produced by an earlier step is missing
    #[error("{} not found. {}", .path.display(), .hint)]
    MissingInput { path: PathBuf, hint: String },

    /// Non-success response from the GitHub REST API
    #[error("GitHub API returned status {status}: {message}")]
    GitHubApi { status: u16, message: String },

    /// Gemini API errors
    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    /// Non-success response from the Slack webhook
    #[error("Slack webhook returned status {status}: {body}")]
    Webhook { status: u16, body: String },
}

/// Result type alias for pr-daily operations
pub type Result<T> = std::result::Result<T, PrDailyError>;

impl PrDailyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Gemini API error
    pub fn gemini_api<S: Into<String>>(msg: S) -> Self {
        Self::GeminiApi(msg.into())
    }

    /// Create a missing-input error with a hint on how to produce the file
    pub fn missing_input<S: Into<String>>(path: impl Into<PathBuf>, hint: S) -> Self {
        Self::MissingInput {
            path: path.into(),
            hint: hint.into(),
        }
    }

    /// Follow-up advice printed after the error, if there is a likely cause
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::GitHubApi { status: 401, .. } => {
                Some("Authentication failed. Please check your GH_PAT.")
            }
            Self::GeminiApi(msg) if msg.contains("API key") => {
                Some("Please check your GOOGLE_API_KEY is valid.")
            }
            Self::MissingConfig {
                env: "SLACK_WEBHOOK_URL",
                ..
            } => Some("Please set up a Slack webhook at https://api.slack.com/messaging/webhooks"),
            _ => None,
        }
    }
}

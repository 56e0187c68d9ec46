use std::{fmt, io};

use config::ConfigError as ConfigLoaderError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading the recognized environment options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `config` loader failed to collect or deserialize a source.
    #[error("Failed to load {source_name} environment options: {source}")]
    Load {
        source_name: &'static str,
        #[source]
        source: ConfigLoaderError,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` for a named environment prefix.
    pub fn from_load_error(source_name: &'static str, source: ConfigLoaderError) -> Self {
        Self::Load {
            source_name,
            source,
        }
    }

    pub fn diagnostics(&self) -> Vec<String> {
        vec![format!("Error: {self}")]
    }
}

/// Body returned by the auth endpoint alongside a failure status.
///
/// Parsing is best-effort: anything that is not JSON is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    Json(Value),
    Text(String),
}

impl ErrorDetail {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    fn diagnostic_line(&self) -> String {
        match self {
            Self::Json(value) => format!("Error details: {value}"),
            Self::Text(text) => format!("Response text: {text}"),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Failures while exchanging client credentials for an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("PORT_CLIENT_ID and PORT_CLIENT_SECRET must be set")]
    MissingCredentials {
        client_id_set: bool,
        client_secret_set: bool,
        actor: String,
        env_name: String,
        auth_base_url: String,
    },
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with HTTP {status}")]
    HttpStatus {
        endpoint: String,
        status: StatusCode,
        detail: ErrorDetail,
    },
    #[error("response from {endpoint} is not valid JSON: {source}")]
    InvalidBody {
        endpoint: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("No access token in response")]
    MissingAccessToken { body: Value },
}

impl AuthError {
    /// Lines written to stderr when this error ends the run.
    ///
    /// Never includes the client secret or any token.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::MissingCredentials {
                client_id_set,
                client_secret_set,
                actor,
                env_name,
                auth_base_url,
            } => vec![
                format!("Error: {self}"),
                format!("Debug: User={actor}, Environment={env_name}"),
                format!("Debug: PORT_CLIENT_ID is {}", set_label(*client_id_set)),
                format!(
                    "Debug: PORT_CLIENT_SECRET is {}",
                    set_label(*client_secret_set)
                ),
                format!("Debug: PORT_AUTH_BASE_URL = {auth_base_url}"),
            ],
            Self::Request { .. } => vec![format!("Error authenticating with Port: {self}")],
            Self::HttpStatus { detail, .. } => vec![
                format!("Error authenticating with Port: {self}"),
                detail.diagnostic_line(),
            ],
            Self::InvalidBody { body, .. } => vec![
                format!("Error authenticating with Port: {self}"),
                format!("Response text: {body}"),
            ],
            Self::MissingAccessToken { body } => {
                vec![format!("Error: {self}"), format!("Response: {body}")]
            }
        }
    }
}

fn set_label(is_set: bool) -> &'static str {
    if is_set {
        "set"
    } else {
        "NOT SET"
    }
}

/// Failures while handing control to the relay process.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to execute relay `{program}`: {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub fn diagnostics(&self) -> Vec<String> {
        vec![format!("Error: {self}")]
    }
}

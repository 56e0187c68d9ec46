//! Client-credential exchange against the Port auth API.
use std::{fmt, io::Write, time::Duration};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, Instrument};

use super::config::LauncherConfig;
use crate::lib::{
    errors::{AuthError, ErrorDetail},
    telemetry::AuthSpan,
};

pub const ACCESS_TOKEN_PATH: &str = "/v1/auth/access_token";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client id and secret, both present.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Require both credentials, reporting which one is unset otherwise.
    pub fn from_config(config: &LauncherConfig) -> Result<Self, AuthError> {
        match (&config.port.client_id, &config.port.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            (client_id, client_secret) => Err(AuthError::MissingCredentials {
                client_id_set: client_id.is_some(),
                client_secret_set: client_secret.is_some(),
                actor: config.github.actor.clone(),
                env_name: config.github.env_name.clone(),
                auth_base_url: config.port.auth_base_url.clone(),
            }),
        }
    }
}

/// Bearer token returned by the auth API. Never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// One POST to the access token endpoint.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub auth_base_url: String,
    pub credentials: Credentials,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenBody<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

impl AuthRequest {
    pub fn from_config(config: &LauncherConfig) -> Result<Self, AuthError> {
        Ok(Self {
            auth_base_url: config.port.auth_base_url.clone(),
            credentials: Credentials::from_config(config)?,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{ACCESS_TOKEN_PATH}", self.auth_base_url)
    }

    fn body(&self) -> AccessTokenBody<'_> {
        AccessTokenBody {
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
        }
    }
}

/// Parsed success body of the access token endpoint.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub access_token: Option<String>,
    pub raw_body: Value,
}

impl AuthResponse {
    pub fn from_json(raw_body: Value) -> Self {
        let access_token = raw_body
            .get("accessToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        Self {
            access_token,
            raw_body,
        }
    }

    pub fn into_token(self) -> Result<AccessToken, AuthError> {
        match self.access_token {
            Some(token) => Ok(AccessToken(token)),
            None => Err(AuthError::MissingAccessToken {
                body: self.raw_body,
            }),
        }
    }
}

/// HTTP client bound to a request timeout.
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: reqwest::Client,
}

impl TokenClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Send the request and validate the response into a token.
    pub async fn acquire(&self, request: &AuthRequest) -> Result<AccessToken, AuthError> {
        let endpoint = request.endpoint();
        let span = AuthSpan::start(&endpoint);
        let result = self
            .send(request, &endpoint)
            .instrument(span.span().clone())
            .await;

        match &result {
            Ok(_) => span.finish("ok", None),
            Err(AuthError::HttpStatus { status, .. }) => {
                span.finish("http_error", Some(status.as_u16()))
            }
            Err(AuthError::Request { .. }) => span.finish("request_failed", None),
            Err(_) => span.finish("invalid_response", None),
        }
        result
    }

    async fn send(&self, request: &AuthRequest, endpoint: &str) -> Result<AccessToken, AuthError> {
        debug!(target: "port_mcp_auth::auth", "Requesting access token");
        let response = self
            .http
            .post(endpoint)
            .json(&request.body())
            .send()
            .await
            .map_err(|source| AuthError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| AuthError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(AuthError::HttpStatus {
                endpoint: endpoint.to_string(),
                status,
                detail: ErrorDetail::from_body(body),
            });
        }

        let raw_body: Value =
            serde_json::from_str(&body).map_err(|source| AuthError::InvalidBody {
                endpoint: endpoint.to_string(),
                body,
                source,
            })?;
        AuthResponse::from_json(raw_body).into_token()
    }
}

/// Exchange the configured credentials for an access token.
///
/// Missing credentials fail before any network I/O. On success a
/// confirmation line naming the actor is written to stderr.
pub async fn acquire_token(config: &LauncherConfig) -> Result<AccessToken, AuthError> {
    acquire_token_with_timeout(config, DEFAULT_REQUEST_TIMEOUT, &mut std::io::stderr()).await
}

/// Like [`acquire_token`], with an explicit timeout and confirmation sink.
pub async fn acquire_token_with_timeout<W: Write>(
    config: &LauncherConfig,
    timeout: Duration,
    status: &mut W,
) -> Result<AccessToken, AuthError> {
    let request = AuthRequest::from_config(config)?;
    let client = TokenClient::new(timeout).map_err(|source| AuthError::Request {
        endpoint: request.endpoint(),
        source,
    })?;
    let token = client.acquire(&request).await?;

    // A closed stderr does not fail the run.
    let _ = writeln!(
        status,
        "Successfully authenticated for user: {}",
        config.github.actor
    );
    Ok(token)
}

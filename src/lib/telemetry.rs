//! Telemetry initialization and auth request span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize `tracing` and format developer logs on stderr.
///
/// stdout is left untouched; it belongs to the relay's stdio transport.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of the token request.
pub struct AuthSpan {
    span: Span,
    started_at: Instant,
}

impl AuthSpan {
    /// Start a span for a POST to `endpoint`.
    pub fn start(endpoint: &str) -> Self {
        let span = info_span!(target: "port_mcp_auth::auth", "access_token_request", endpoint);
        Self {
            span,
            started_at: Instant::now(),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording the outcome and HTTP status.
    pub fn finish(self, outcome: &'static str, http_status: Option<u16>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "port_mcp_auth::auth",
            outcome,
            http_status,
            elapsed_ms,
            "Completed access token request"
        );
    }
}

/// Payload for logging the relay hand-off as structured telemetry.
#[derive(Debug)]
pub struct RelayLaunchTelemetry<'a> {
    pub program: &'a str,
    pub mcp_url: &'a str,
    pub redacted_args: &'a [String],
    pub passthrough_count: usize,
}

/// Emit the relay hand-off to `tracing`. Arguments must already be redacted.
pub fn emit_relay_launch(telemetry: &RelayLaunchTelemetry<'_>) {
    info!(
        target: "port_mcp_auth::relay",
        program = telemetry.program,
        mcp_url = telemetry.mcp_url,
        args = ?telemetry.redacted_args,
        passthrough_count = telemetry.passthrough_count,
        "Launching relay"
    );
}

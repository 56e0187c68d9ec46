use std::{ffi::OsString, process::ExitCode};

use crate::{
    launcher::{
        auth::acquire_token,
        config::LauncherConfig,
        relay::{build_launch_command, ProcessLauncher},
    },
    lib::{
        errors::{AuthError, ConfigError, LaunchError},
        telemetry::{emit_relay_launch, RelayLaunchTelemetry},
    },
};

/// Where the run was when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Startup,
    AcquiringToken,
    LaunchingRelay,
}

impl LaunchPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LaunchPhase::Startup => "startup",
            LaunchPhase::AcquiringToken => "acquiring_token",
            LaunchPhase::LaunchingRelay => "launching_relay",
        }
    }
}

/// Bundles stderr diagnostics with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    lines: Vec<String>,
    exit_code: ExitCode,
    phase: LaunchPhase,
}

impl RuntimeExit {
    pub fn new(lines: Vec<String>, phase: LaunchPhase) -> Self {
        Self {
            lines,
            exit_code: ExitCode::FAILURE,
            phase,
        }
    }

    pub fn from_error(err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        Self::new(vec![format!("Error: {err:#}")], LaunchPhase::Startup)
    }

    pub fn report(self) -> ExitCode {
        tracing::error!(
            target: "port_mcp_auth::runtime",
            phase = self.phase.as_str(),
            "Launcher stopped before the relay took over"
        );
        for line in &self.lines {
            eprintln!("{line}");
        }
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn phase(&self) -> LaunchPhase {
        self.phase
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl From<ConfigError> for RuntimeExit {
    fn from(err: ConfigError) -> Self {
        Self::new(err.diagnostics(), LaunchPhase::Startup)
    }
}

impl From<AuthError> for RuntimeExit {
    fn from(err: AuthError) -> Self {
        Self::new(err.diagnostics(), LaunchPhase::AcquiringToken)
    }
}

impl From<LaunchError> for RuntimeExit {
    fn from(err: LaunchError) -> Self {
        Self::new(err.diagnostics(), LaunchPhase::LaunchingRelay)
    }
}

/// Acquire a token, then hand control to the relay.
///
/// With [`crate::launcher::relay::ExecLauncher`] on Unix this returns only on failure.
pub async fn run<L: ProcessLauncher>(
    config: &LauncherConfig,
    passthrough: Vec<OsString>,
    launcher: &L,
) -> Result<ExitCode, RuntimeExit> {
    let token = acquire_token(config).await?;

    let command = build_launch_command(config, &token, &passthrough);
    drop(token);

    let redacted_args = command.redacted_args();
    emit_relay_launch(&RelayLaunchTelemetry {
        program: &command.program,
        mcp_url: &config.port.mcp_url,
        redacted_args: &redacted_args,
        passthrough_count: passthrough.len(),
    });

    Ok(launcher.launch(command)?)
}

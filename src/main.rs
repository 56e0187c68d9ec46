//! Entry point for port-mcp-auth.
use std::process::ExitCode;

use port_mcp_auth::{
    cli::LauncherArgs,
    launcher::{self, ExecLauncher, LauncherConfig, RuntimeExit},
    lib::telemetry,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(code) => code,
        Err(exit) => exit.report(),
    }
}

async fn bootstrap() -> Result<ExitCode, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let passthrough = LauncherArgs::parse_env().into_passthrough();
    let config = LauncherConfig::load_from_env()?;
    launcher::run(&config, passthrough, &ExecLauncher).await
}

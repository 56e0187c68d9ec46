//! Relay command construction and the process hand-off.
use std::{
    ffi::{OsStr, OsString},
    fmt,
    process::{Command, ExitCode},
};

use super::{auth::AccessToken, config::LauncherConfig};
use crate::lib::errors::LaunchError;

pub const RELAY_PROGRAM: &str = "npx";
pub const RELAY_SUBCOMMAND: &str = "mcp-remote";
pub const HEADER_FLAG: &str = "--header";
const BEARER_PREFIX: &str = "Authorization: Bearer ";
const REDACTED_HEADER: &str = "Authorization: Bearer <redacted>";

/// Program and argv handed to the relay.
#[derive(Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<OsString>,
}

impl LaunchCommand {
    /// Arguments as lossy strings with the bearer token masked, for logging.
    pub fn redacted_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                let arg = arg.to_string_lossy();
                if arg.starts_with(BEARER_PREFIX) {
                    REDACTED_HEADER.to_string()
                } else {
                    arg.into_owned()
                }
            })
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Debug for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchCommand")
            .field("program", &self.program)
            .field("args", &self.redacted_args())
            .finish()
    }
}

/// Build `npx mcp-remote <mcp_url> --header "Authorization: Bearer <token>" [passthrough...]`.
pub fn build_launch_command<I, S>(
    config: &LauncherConfig,
    token: &AccessToken,
    passthrough: I,
) -> LaunchCommand
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut args: Vec<OsString> = vec![
        RELAY_SUBCOMMAND.into(),
        config.port.mcp_url.as_str().into(),
        HEADER_FLAG.into(),
        format!("{BEARER_PREFIX}{}", token.expose()).into(),
    ];
    args.extend(passthrough.into_iter().map(|arg| arg.as_ref().to_os_string()));

    LaunchCommand {
        program: RELAY_PROGRAM.to_string(),
        args,
    }
}

/// Capability that hands control to the relay.
///
/// Production launchers replace the current process and return only on
/// failure; test doubles record the command and return an exit code.
pub trait ProcessLauncher {
    fn launch(&self, command: LaunchCommand) -> Result<ExitCode, LaunchError>;
}

/// Replaces the process image on Unix; spawns and waits elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecLauncher;

impl ProcessLauncher for ExecLauncher {
    #[cfg(unix)]
    fn launch(&self, command: LaunchCommand) -> Result<ExitCode, LaunchError> {
        use std::os::unix::process::CommandExt;

        let source = command.to_command().exec();
        Err(LaunchError::Exec {
            program: command.program,
            source,
        })
    }

    #[cfg(not(unix))]
    fn launch(&self, command: LaunchCommand) -> Result<ExitCode, LaunchError> {
        let status = command
            .to_command()
            .status()
            .map_err(|source| LaunchError::Exec {
                program: command.program.clone(),
                source,
            })?;
        Ok(status
            .code()
            .and_then(|code| u8::try_from(code).ok())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE))
    }
}

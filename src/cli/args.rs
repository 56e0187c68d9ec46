//! CLI argument definitions.
use std::ffi::OsString;

use clap::Parser;

/// Command-line arguments.
///
/// The launcher owns no flags; everything, including `--help`, is forwarded.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "port-mcp-auth",
    about = "Authenticate against Port and launch mcp-remote with the access token",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct LauncherArgs {
    /// Arguments appended verbatim to the mcp-remote command line.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub passthrough: Vec<OsString>,
}

impl LauncherArgs {
    /// Parse `std::env::args_os()`, exiting with clap's usage error on failure.
    pub fn parse_env() -> Self {
        Self::try_parse_verbatim(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse `args` (program name first) and keep every argument after the
    /// program name, including a `--` clap would consume as its separator.
    pub fn try_parse_verbatim<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let raw: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut parsed = Self::try_parse_from(&raw)?;
        parsed.passthrough = raw.get(1..).unwrap_or_default().to_vec();
        Ok(parsed)
    }

    pub fn into_passthrough(self) -> Vec<OsString> {
        self.passthrough
    }
}

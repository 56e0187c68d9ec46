//! Token acquisition and relay hand-off.
pub mod auth;
pub mod config;
pub mod relay;
pub mod runtime;

pub use auth::{acquire_token, AccessToken, AuthRequest, AuthResponse, Credentials, TokenClient};
pub use config::LauncherConfig;
pub use relay::{build_launch_command, ExecLauncher, LaunchCommand, ProcessLauncher};
pub use runtime::{run, LaunchPhase, RuntimeExit};

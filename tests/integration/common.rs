use std::{
    path::Path,
    process::{Output, Stdio},
};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_port-mcp-auth");
pub const ACCESS_TOKEN_PATH: &str = "/v1/auth/access_token";
pub const RECORDED_ARGS_FILE: &str = "relay-args.txt";

/// Directory holding a fake `npx` that records its argv and exits with 7.
pub struct FakeRelay {
    dir: TempDir,
}

impl FakeRelay {
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().context("failed to create relay directory")?;
        let script = dir.path().join("npx");
        let record = dir.path().join(RECORDED_ARGS_FILE);
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nexit 7\n",
                record.display()
            ),
        )
        .context("failed to write fake npx")?;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .context("failed to mark fake npx executable")?;
        Ok(Self { dir })
    }

    pub fn bin_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn recorded_args(&self) -> Option<Vec<String>> {
        std::fs::read_to_string(self.dir.path().join(RECORDED_ARGS_FILE))
            .ok()
            .map(|content| content.lines().map(str::to_string).collect())
    }
}

pub async fn mock_auth_server(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACCESS_TOKEN_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Launcher command with a clean environment plus `vars`, resolving `npx` only from `path_dir`.
pub fn launcher_command(vars: &[(&str, &str)], args: &[&str], path_dir: &Path) -> Command {
    let mut command = Command::new(BINARY_PATH);
    command
        .env_clear()
        .env("PATH", path_dir)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in vars {
        command.env(key, value);
    }
    command
}

pub async fn run_launcher(
    vars: &[(&str, &str)],
    args: &[&str],
    path_dir: &Path,
) -> Result<Output> {
    launcher_command(vars, args, path_dir)
        .output()
        .await
        .context("failed to run port-mcp-auth")
}

pub fn empty_path_dir() -> Result<TempDir> {
    tempfile::tempdir().context("failed to create empty PATH directory")
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

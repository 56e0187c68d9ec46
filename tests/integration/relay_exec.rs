#![cfg(unix)]

use anyhow::{Context, Result};
use serde_json::json;

use crate::common::{mock_auth_server, run_launcher, stderr_of, FakeRelay};

async fn launch_with_token(token: &str, args: &[&str]) -> Result<(Vec<String>, String, i32)> {
    let server = mock_auth_server(200, json!({ "accessToken": token })).await;
    let relay = FakeRelay::install()?;
    let base_url = server.uri();

    let output = run_launcher(
        &[
            ("PORT_CLIENT_ID", "client-id"),
            ("PORT_CLIENT_SECRET", "client-secret"),
            ("PORT_AUTH_BASE_URL", base_url.as_str()),
            ("PORT_MCP_URL", "https://mcp.example.test/v1"),
            ("GITHUB_ACTOR", "octocat"),
        ],
        args,
        relay.bin_dir(),
    )
    .await?;

    let recorded = relay
        .recorded_args()
        .with_context(|| format!("relay was not launched: {output:?}"))?;
    let code = output.status.code().context("relay exited by signal")?;
    Ok((recorded, stderr_of(&output), code))
}

#[tokio::test]
async fn relay_replaces_launcher_and_receives_token_header() -> Result<()> {
    let (args, stderr, code) =
        launch_with_token("integration-token", &["--foo", "bar"]).await?;

    assert_eq!(
        args,
        vec![
            "mcp-remote",
            "https://mcp.example.test/v1",
            "--header",
            "Authorization: Bearer integration-token",
            "--foo",
            "bar",
        ]
    );
    assert_eq!(code, 7, "relay exit code must become the process exit code");
    assert!(
        stderr.contains("Successfully authenticated for user: octocat"),
        "{stderr}"
    );
    assert!(!stderr.contains("integration-token"), "{stderr}");
    Ok(())
}

#[tokio::test]
async fn help_flag_is_forwarded_to_relay() -> Result<()> {
    let (args, _, _) = launch_with_token("T", &["--help"]).await?;

    assert_eq!(args.last().map(String::as_str), Some("--help"));
    Ok(())
}

#[tokio::test]
async fn runs_with_different_tokens_differ_only_in_header() -> Result<()> {
    let (first, _, _) = launch_with_token("token-one", &["--transport", "stdio"]).await?;
    let (second, _, _) = launch_with_token("token-two", &["--transport", "stdio"]).await?;

    assert_eq!(first.len(), second.len());
    for (index, (left, right)) in first.iter().zip(&second).enumerate() {
        if index == 3 {
            assert_eq!(left.replace("token-one", "token-two"), *right);
        } else {
            assert_eq!(left, right);
        }
    }
    Ok(())
}

#[tokio::test]
async fn leading_separator_is_forwarded_to_relay() -> Result<()> {
    let (args, _, _) = launch_with_token("T", &["--", "--foo"]).await?;

    assert_eq!(&args[4..], ["--", "--foo"]);
    Ok(())
}

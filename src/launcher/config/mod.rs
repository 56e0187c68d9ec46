//! Read the recognized environment options once at startup.
use std::{env, ffi::OsString};

use serde::de::DeserializeOwned;
use tracing::error;

use crate::lib::errors::ConfigError;

pub mod github;
pub mod port;
pub mod telemetry;

pub use github::{
    parse_github_section, GithubSection, RawGithubSection, DEFAULT_ACTOR, DEFAULT_ENV_NAME,
};
pub use port::{
    parse_port_section, PortSection, RawPortSection, DEFAULT_AUTH_BASE_URL, DEFAULT_MCP_URL,
};

const PORT_ENV_PREFIX: &str = "PORT";
const GITHUB_ENV_PREFIX: &str = "GITHUB";

/// Top-level configuration container, injected into every launcher operation.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub port: PortSection,
    pub github: GithubSection,
}

impl LauncherConfig {
    /// Read `PORT_*` and `GITHUB_*` options from the process environment.
    ///
    /// Unrelated variables are never decoded, so non-UTF-8 entries elsewhere
    /// in the environment do not abort the run.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::load(recognized_vars(env::vars_os()))
    }

    /// Read options from an explicit variable map instead of the process environment.
    pub fn load_from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<config::Map<String, String>>();
        Self::load(map)
    }

    fn load(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        let raw_port: RawPortSection = load_section(PORT_ENV_PREFIX, vars.clone())?;
        let raw_github: RawGithubSection = load_section(GITHUB_ENV_PREFIX, vars)?;

        let config = Self {
            port: parse_port_section(raw_port),
            github: parse_github_section(raw_github),
        };
        telemetry::log_loaded(&config);
        Ok(config)
    }
}

/// Keep `PORT_*` and `GITHUB_*` entries whose key and value are both UTF-8.
fn recognized_vars<I>(vars: I) -> config::Map<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter(|(key, _)| {
            [PORT_ENV_PREFIX, GITHUB_ENV_PREFIX].iter().any(|prefix| {
                key.get(..prefix.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
                    && key.as_bytes().get(prefix.len()) == Some(&b'_')
            })
        })
        .collect()
}

fn load_section<T: DeserializeOwned>(
    prefix: &'static str,
    vars: config::Map<String, String>,
) -> Result<T, ConfigError> {
    config::Config::builder()
        .add_source(config::Environment::with_prefix(prefix).source(Some(vars)))
        .build()
        .and_then(|document| document.try_deserialize())
        .map_err(|err| {
            let error = ConfigError::from_load_error(prefix, err);
            error!(
                target: "port_mcp_auth::config",
                prefix,
                reason = %error,
                "Failed to load environment options"
            );
            error
        })
}

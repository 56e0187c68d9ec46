use serde::Deserialize;

use super::port::non_empty;

pub const DEFAULT_ACTOR: &str = "unknown";
pub const DEFAULT_ENV_NAME: &str = "default";

/// Workflow context used only in diagnostics.
#[derive(Debug, Clone)]
pub struct GithubSection {
    pub actor: String,
    pub env_name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawGithubSection {
    pub actor: Option<String>,
    pub env_name: Option<String>,
}

pub fn parse_github_section(raw: RawGithubSection) -> GithubSection {
    GithubSection {
        actor: non_empty(raw.actor).unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        env_name: non_empty(raw.env_name).unwrap_or_else(|| DEFAULT_ENV_NAME.to_string()),
    }
}

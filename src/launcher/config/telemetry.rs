use tracing::debug;

use super::LauncherConfig;

pub fn log_loaded(config: &LauncherConfig) {
    debug!(
        target: "port_mcp_auth::config",
        client_id_set = config.port.client_id.is_some(),
        client_secret_set = config.port.client_secret.is_some(),
        auth_base_url = %config.port.auth_base_url,
        mcp_url = %config.port.mcp_url,
        actor = %config.github.actor,
        env_name = %config.github.env_name,
        "Environment options loaded"
    );
}

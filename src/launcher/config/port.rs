use serde::Deserialize;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://api.getport.io";
pub const DEFAULT_MCP_URL: &str = "https://mcp.us.port.io/v1";

/// Port credentials and endpoints.
#[derive(Clone)]
pub struct PortSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub auth_base_url: String,
    pub mcp_url: String,
}

impl std::fmt::Debug for PortSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortSection")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("auth_base_url", &self.auth_base_url)
            .field("mcp_url", &self.mcp_url)
            .finish()
    }
}

/// `PORT_*` variables as seen by the `config` environment source.
#[derive(Debug, Deserialize, Default)]
pub struct RawPortSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub auth_base_url: Option<String>,
    pub mcp_url: Option<String>,
}

pub fn parse_port_section(raw: RawPortSection) -> PortSection {
    let auth_base_url = non_empty(raw.auth_base_url)
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string());
    let mcp_url = non_empty(raw.mcp_url).unwrap_or_else(|| DEFAULT_MCP_URL.to_string());

    PortSection {
        client_id: non_empty(raw.client_id),
        client_secret: non_empty(raw.client_secret),
        auth_base_url,
        mcp_url,
    }
}

/// Empty values count as unset; whitespace is kept as given.
pub(super) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

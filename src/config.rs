//! Client configuration and the host environment the client reads from

use clap::Parser;

use crate::error::{TcError, TcResult};

const ENV_API_PATH: &str = "TC_API_PATH";
const ENV_TOKEN: &str = "TC_TOKEN";
const ENV_SPACE_ELEMENT_ID: &str = "TC_SPACE_ELEMENT_ID";

/// Values the hosting environment supplies to every request.
///
/// Implementations are consulted on each call, never cached by the client, so a
/// rotated token is picked up by the next request.
pub trait ApiContext: Send + Sync {
    /// Base URL of the ThreatConnect API, e.g. `https://app.threatconnect.com/api`
    fn api_base_path(&self) -> String;

    /// Token sent as `Authorization: TC-Token <token>`
    fn current_token(&self) -> String;

    /// Element id of the hosting space, required by the spaces endpoints
    fn space_element_id(&self) -> Option<String> {
        None
    }
}

/// ThreatConnect client settings
#[derive(Parser, Debug, Clone)]
#[command(name = "tc-api-client")]
#[command(about = "ThreatConnect API connection settings")]
pub struct ClientConfig {
    /// ThreatConnect API base path
    #[arg(long, env = "TC_API_PATH")]
    pub tc_api_path: String,

    /// ThreatConnect API token
    #[arg(long, env = "TC_TOKEN", hide_env_values = true)]
    pub tc_token: String,

    /// Space element id for spaces file/job/state endpoints
    #[arg(long, env = "TC_SPACE_ELEMENT_ID")]
    pub tc_space_element_id: Option<String>,
}

impl ClientConfig {
    /// Load settings from the process environment, reading `.env` first if present
    pub fn from_env() -> TcResult<Self> {
        dotenvy::dotenv().ok();

        Self::try_parse_from(["tc-api-client"]).map_err(|e| TcError::Config(e.to_string()))
    }
}

impl ApiContext for ClientConfig {
    fn api_base_path(&self) -> String {
        self.tc_api_path.clone()
    }

    fn current_token(&self) -> String {
        self.tc_token.clone()
    }

    fn space_element_id(&self) -> Option<String> {
        self.tc_space_element_id.clone()
    }
}

/// Context that re-reads `TC_API_PATH`, `TC_TOKEN` and `TC_SPACE_ELEMENT_ID` on every call
#[derive(Debug, Clone)]
pub struct EnvContext;

impl EnvContext {
    /// Reads `.env` into the process environment first, if present
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        Self
    }
}

impl Default for EnvContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiContext for EnvContext {
    fn api_base_path(&self) -> String {
        std::env::var(ENV_API_PATH).unwrap_or_default()
    }

    fn current_token(&self) -> String {
        std::env::var(ENV_TOKEN).unwrap_or_default()
    }

    fn space_element_id(&self) -> Option<String> {
        std::env::var(ENV_SPACE_ELEMENT_ID)
            .ok()
            .filter(|id| !id.is_empty())
    }
}

//! Identity of the calling token

use serde_json::Value;

use crate::error::TcResult;
use crate::models::ResourceType;
use crate::request::ApiClient;

/// The user the current token authenticates as
#[derive(Clone)]
pub struct WhoAmIService {
    api: ApiClient,
}

impl WhoAmIService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Raw `v2/whoami` response
    pub async fn get(&self) -> TcResult<Value> {
        tracing::debug!("Reading current user");

        let whoami = ResourceType::lookup("WhoAmI")?;
        let url = self.api.endpoint(whoami.uri, &[])?;
        self.api.get(url, None, None).await
    }
}

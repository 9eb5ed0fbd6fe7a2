//! Owner lookups

use reqwest::Method;
use serde_json::json;

use crate::error::TcResult;
use crate::models::{Envelope, Owner, ResourceType, from_value, records_from_value};
use crate::request::ApiClient;

#[derive(Clone)]
pub struct OwnerService {
    api: ApiClient,
}

impl OwnerService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_by_id(&self, id: i64) -> TcResult<Owner> {
        tracing::debug!(id, "Reading owner");

        let resource = ResourceType::lookup("Owner")?;
        let url = self.api.endpoint(resource.uri, &[&id.to_string()])?;
        let owner = self.api.get(url, None, Some(resource.envelope_key)).await?;
        from_value(owner)
    }

    /// Owners that hold a given indicator value
    pub async fn get_by_indicator(
        &self,
        indicator: &str,
        indicator_type: &str,
    ) -> TcResult<Vec<Owner>> {
        tracing::debug!(indicator, resource = indicator_type, "Reading owners of indicator");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[indicator, "owners"])?;
        self.owner_listing(url).await
    }

    pub async fn get_all(&self) -> TcResult<Vec<Owner>> {
        tracing::debug!("Listing owners");

        let resource = ResourceType::lookup("Owner")?;
        let url = self.api.endpoint(resource.uri, &[])?;
        self.owner_listing(url).await
    }

    async fn owner_listing(&self, url: url::Url) -> TcResult<Vec<Owner>> {
        let resource = ResourceType::lookup("Owner")?;
        let key = resource.listing_key.unwrap_or(resource.envelope_key);
        let response = self.api.request(Method::GET, url).send().await?;

        records_from_value(Envelope::from_body(response).into_field_or(key, json!([])))
    }
}

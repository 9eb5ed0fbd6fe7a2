//! Security labels

use reqwest::Method;
use serde_json::{Value, json};

use crate::error::TcResult;
use crate::models::{Envelope, ResourceType, SecurityLabel, records_from_value};
use crate::request::{ApiClient, ListOptions};

#[derive(Clone)]
pub struct SecurityLabelService {
    api: ApiClient,
}

impl SecurityLabelService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all(&self, options: &ListOptions) -> TcResult<Vec<SecurityLabel>> {
        tracing::debug!(owner = ?options.owner, "Listing security labels");

        let labels = ResourceType::lookup("SecurityLabel")?;
        let url = self.api.endpoint(labels.uri, &[])?;
        self.labels_at(url, options).await
    }

    /// Labels applied to an entity
    pub async fn get_for_entity(
        &self,
        id: &str,
        entity_type: &str,
        options: &ListOptions,
    ) -> TcResult<Vec<SecurityLabel>> {
        tracing::debug!(id, resource = entity_type, "Reading entity security labels");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "securityLabels"])?;
        self.labels_at(url, options).await
    }

    /// Labels applied to one attribute of an entity
    pub async fn get_for_attribute(
        &self,
        id: &str,
        entity_type: &str,
        attribute_id: &str,
        options: &ListOptions,
    ) -> TcResult<Vec<SecurityLabel>> {
        tracing::debug!(
            id,
            resource = entity_type,
            attribute_id,
            "Reading attribute security labels"
        );

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(
            resource.uri,
            &[id, "attributes", attribute_id, "securityLabels"],
        )?;
        self.labels_at(url, options).await
    }

    pub async fn add_label(
        &self,
        id: &str,
        entity_type: &str,
        label: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, label, "Adding security label");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "securityLabels", label])?;
        self.api.post(url, owner, None).await
    }

    pub async fn delete_label(
        &self,
        id: &str,
        entity_type: &str,
        label: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, label, "Removing security label");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "securityLabels", label])?;
        self.api.delete(url, owner).await
    }

    async fn labels_at(
        &self,
        url: url::Url,
        options: &ListOptions,
    ) -> TcResult<Vec<SecurityLabel>> {
        let labels = ResourceType::lookup("SecurityLabel")?;
        let key = labels.listing_key.unwrap_or(labels.envelope_key);
        let response = self
            .api
            .request(Method::GET, url)
            .list_options(options)
            .send()
            .await?;

        records_from_value(Envelope::from_body(response).into_field_or(key, json!([])))
    }
}

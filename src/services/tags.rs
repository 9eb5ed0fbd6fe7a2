//! Tags, globally and on individual entities

use reqwest::Method;
use serde_json::Value;

use crate::error::TcResult;
use crate::models::{Envelope, ResourceType, Tag, from_value, records_from_value};
use crate::request::{ApiClient, ListOptions};

#[derive(Clone)]
pub struct TagService {
    api: ApiClient,
}

impl TagService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_by_name(&self, name: &str, owner: Option<&str>) -> TcResult<Tag> {
        tracing::debug!(name, "Reading tag");

        let resource = ResourceType::lookup("Tag")?;
        let url = self.api.endpoint(resource.uri, &[name])?;
        let tag = self.api.get(url, owner, Some(resource.envelope_key)).await?;
        from_value(tag)
    }

    /// Raw `data` of the tag listing, including `resultCount`
    pub async fn get_all(&self, options: &ListOptions) -> TcResult<Value> {
        tracing::debug!(owner = ?options.owner, "Listing tags");

        let resource = ResourceType::lookup("Tag")?;
        let url = self.api.endpoint(resource.uri, &[])?;
        let response = self
            .api
            .request(Method::GET, url)
            .list_options(options)
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_data())
    }

    /// Tags applied to an indicator, group or victim
    pub async fn get_tags(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Vec<Tag>> {
        tracing::debug!(id, resource = entity_type, "Reading entity tags");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "tags"])?;
        records_from_value(self.api.get(url, owner, Some("tag")).await?)
    }

    /// Apply a tag; the tag name travels percent-encoded in the path
    pub async fn add_tag(
        &self,
        id: &str,
        entity_type: &str,
        tag: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, tag, "Adding tag");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "tags", tag])?;
        self.api.post(url, owner, None).await
    }

    pub async fn delete_tag(
        &self,
        id: &str,
        entity_type: &str,
        tag: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, tag, "Removing tag");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "tags", tag])?;
        self.api.delete(url, owner).await
    }
}

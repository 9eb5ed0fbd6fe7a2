//! Group CRUD (adversaries, incidents, threats, documents, emails, signatures, tasks)

use reqwest::Method;
use serde_json::Value;

use crate::error::{TcError, TcResult};
use crate::models::{Envelope, Group, ResourceType, from_value};
use crate::request::{ApiClient, ListOptions};

#[derive(Clone)]
pub struct GroupService {
    api: ApiClient,
}

impl GroupService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Read one group, optionally with its attributes and tags inlined
    pub async fn get_by_id(
        &self,
        id: &str,
        group_type: &str,
        owner: Option<&str>,
        include_attributes: bool,
        include_tags: bool,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = group_type, "Reading group");

        let resource = ResourceType::lookup(group_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        let response = self
            .api
            .request(Method::GET, url)
            .owner(owner)
            .includes(include_attributes, include_tags)
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_field(resource.envelope_key))
    }

    /// Read one group as a record; subtype fields land in `extra`
    pub async fn get_group(
        &self,
        id: &str,
        group_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Group> {
        from_value(self.get_by_id(id, group_type, owner, false, false).await?)
    }

    /// List groups of a type; `Group` lists every group type
    pub async fn get_all(&self, group_type: &str, options: &ListOptions) -> TcResult<Value> {
        tracing::debug!(resource = group_type, owner = ?options.owner, "Listing groups");

        let resource = ResourceType::lookup(group_type)?;
        let url = self.api.endpoint(resource.uri, &[])?;
        let response = self
            .api
            .request(Method::GET, url)
            .list_options(options)
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_data())
    }

    pub async fn create_group(
        &self,
        group_type: &str,
        group: &Group,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(resource = group_type, name = ?group.name, "Creating group");

        let resource = ResourceType::lookup(group_type)?;
        let url = self.api.endpoint(resource.uri, &[])?;
        let response = self
            .api
            .request(Method::POST, url)
            .owner(owner)
            .json_from(group)?
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_field(resource.envelope_key))
    }

    pub async fn update_group(
        &self,
        id: &str,
        group_type: &str,
        group: &Group,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = group_type, "Updating group");

        let resource = ResourceType::lookup(group_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        let body = serde_json::to_value(group).map_err(TcError::Serialization)?;

        self.api.put(url, owner, resource.envelope_key, Some(body)).await
    }

    pub async fn delete_group(
        &self,
        id: &str,
        group_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = group_type, "Deleting group");

        let resource = ResourceType::lookup(group_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        self.api.delete(url, owner).await
    }
}

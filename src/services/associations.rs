//! Associations between indicators, groups, victims and victim assets
//!
//! Reads unwrap the associated collection (`indicator`, `group`, `victimAsset`,
//! `victim`). Association links are addressed as
//! `<entity>/<id>/<collection>/<associationType>/<associationId>`, except victims
//! which the API addresses without an association type.

use serde_json::Value;

use crate::error::TcResult;
use crate::models::{ResourceType, Victim, VictimAsset, records_from_value};
use crate::request::ApiClient;

#[derive(Clone)]
pub struct AssociationService {
    api: ApiClient,
}

impl AssociationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_associated_indicators(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.associated(id, entity_type, owner, "indicators", "indicator")
            .await
    }

    pub async fn get_associated_groups(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        self.associated(id, entity_type, owner, "groups", "group").await
    }

    pub async fn get_associated_victim_assets(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Vec<VictimAsset>> {
        let assets = self
            .associated(id, entity_type, owner, "victimAssets", "victimAsset")
            .await?;
        records_from_value(assets)
    }

    pub async fn get_associated_victims(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Vec<Victim>> {
        let victims = self
            .associated(id, entity_type, owner, "victims", "victim")
            .await?;
        records_from_value(victims)
    }

    pub async fn associate_indicator(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["indicators", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.post(url, owner, None).await
    }

    pub async fn associate_group(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["groups", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.post(url, owner, None).await
    }

    pub async fn associate_victim_asset(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["victimAssets", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.post(url, owner, None).await
    }

    pub async fn associate_victim(
        &self,
        association_id: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let url = self.link_url(id, entity_type, &["victims", association_id])?;
        self.api.post(url, owner, None).await
    }

    pub async fn disassociate_indicator(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["indicators", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.delete(url, owner).await
    }

    pub async fn disassociate_group(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["groups", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.delete(url, owner).await
    }

    pub async fn disassociate_victim_asset(
        &self,
        association_id: &str,
        association_type: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let link = ["victimAssets", association_type, association_id];
        let url = self.link_url(id, entity_type, &link)?;
        self.api.delete(url, owner).await
    }

    pub async fn disassociate_victim(
        &self,
        association_id: &str,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let url = self.link_url(id, entity_type, &["victims", association_id])?;
        self.api.delete(url, owner).await
    }

    async fn associated(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
        collection: &str,
        data_key: &str,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, collection, "Reading associations");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, collection])?;
        self.api.get(url, owner, Some(data_key)).await
    }

    fn link_url(&self, id: &str, entity_type: &str, link: &[&str]) -> TcResult<url::Url> {
        tracing::debug!(id, resource = entity_type, link = ?link, "Building association link");

        let resource = ResourceType::lookup(entity_type)?;
        let mut segments = vec![id];
        segments.extend_from_slice(link);
        self.api.endpoint(resource.uri, &segments)
    }
}

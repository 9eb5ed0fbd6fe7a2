//! Attributes on indicators, groups and victims

use serde_json::Value;

use crate::error::{TcError, TcResult};
use crate::models::{Attribute, ResourceType, from_value, records_from_value};
use crate::request::ApiClient;

#[derive(Clone)]
pub struct AttributeService {
    api: ApiClient,
}

impl AttributeService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_attributes(
        &self,
        id: &str,
        entity_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Vec<Attribute>> {
        tracing::debug!(id, resource = entity_type, "Reading attributes");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "attributes"])?;
        records_from_value(self.api.get(url, owner, Some("attribute")).await?)
    }

    pub async fn get_attribute(
        &self,
        id: &str,
        entity_type: &str,
        attribute_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Attribute> {
        tracing::debug!(id, resource = entity_type, attribute_id, "Reading attribute");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self
            .api
            .endpoint(resource.uri, &[id, "attributes", attribute_id])?;
        from_value(self.api.get(url, owner, Some("attribute")).await?)
    }

    pub async fn create_attribute(
        &self,
        id: &str,
        entity_type: &str,
        attribute: &Attribute,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(
            id,
            resource = entity_type,
            attribute_type = ?attribute.attribute_type,
            "Creating attribute"
        );

        let resource = ResourceType::lookup(entity_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "attributes"])?;
        let body = serde_json::to_value(attribute).map_err(TcError::Serialization)?;
        self.api
            .post_with_data_key(url, owner, "attribute", Some(body))
            .await
    }

    pub async fn update_attribute(
        &self,
        id: &str,
        entity_type: &str,
        attribute_id: &str,
        attribute: &Attribute,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, attribute_id, "Updating attribute");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self
            .api
            .endpoint(resource.uri, &[id, "attributes", attribute_id])?;
        let body = serde_json::to_value(attribute).map_err(TcError::Serialization)?;
        self.api.put(url, owner, "attribute", Some(body)).await
    }

    pub async fn delete_attribute(
        &self,
        id: &str,
        entity_type: &str,
        attribute_id: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = entity_type, attribute_id, "Deleting attribute");

        let resource = ResourceType::lookup(entity_type)?;
        let url = self
            .api
            .endpoint(resource.uri, &[id, "attributes", attribute_id])?;
        self.api.delete(url, owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBody;
    use crate::request::test_support::*;
    use reqwest::Method;

    #[test]
    fn attribute_value_is_json_escaped() {
        let client = client_expecting(
            |req| {
                req.method == Method::POST
                    && req.url.path() == "/api/v2/groups/adversaries/3/attributes"
                    && matches!(
                        &req.body,
                        Some(RequestBody::Json(body))
                            if body["value"] == r#"he said "hi" 'there'"#
                                && body["type"] == "Description"
                    )
            },
            r#"{"status":"Success","data":{"attribute":{"id":12,"type":"Description"}}}"#,
        );
        let service = AttributeService::new(client);
        let attribute = Attribute::new("Description", r#"he said "hi" 'there'"#);

        let created =
            tokio_test::block_on(service.create_attribute("3", "Adversary", &attribute, None))
                .unwrap();
        assert_eq!(created["id"], 12);
    }

    #[test]
    fn attributes_decode_into_records() {
        let client = client_expecting(
            |req| req.url.path() == "/api/v2/indicators/addresses/10.0.0.1/attributes",
            r#"{"status":"Success","data":{"resultCount":1,"attribute":[{"id":5,"type":"Source","value":"honeypot","displayed":true}]}}"#,
        );
        let service = AttributeService::new(client);

        let attributes =
            tokio_test::block_on(service.get_attributes("10.0.0.1", "Address", None)).unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].attribute_type.as_deref(), Some("Source"));
        assert_eq!(attributes[0].value.as_deref(), Some("honeypot"));
        assert_eq!(attributes[0].displayed, Some(true));
    }
}

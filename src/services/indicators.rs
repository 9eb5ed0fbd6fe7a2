//! Indicator CRUD, observations and false positives

use reqwest::Method;
use serde_json::{Value, json};

use crate::error::{TcError, TcResult};
use crate::models::indicator_utils::{normalize_listing, select_indicator_field};
use crate::models::{Envelope, Indicator, Observation, ResourceType, from_value};
use crate::request::{ApiClient, ListOptions};

/// Service for indicator endpoints (`v2/indicators/...`)
#[derive(Clone)]
pub struct IndicatorService {
    api: ApiClient,
}

impl IndicatorService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create an indicator in the given owner.
    ///
    /// The indicator `summary` is posted under the wire field its type expects
    /// (`ip`, `hostName`, `text`, ...); file hashes are routed by length.
    pub async fn create_indicator(
        &self,
        indicator: &Indicator,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        let type_name = indicator.indicator_type.as_deref().unwrap_or("Indicator");
        tracing::debug!(resource = type_name, owner = ?owner, "Creating indicator");

        let resource = ResourceType::lookup(type_name)?;
        let body = wire_body(indicator, resource)?;
        let url = self.api.endpoint(resource.uri, &[])?;

        let response = self
            .api
            .request(Method::POST, url)
            .owner(owner)
            .json(body)
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_field(resource.envelope_key))
    }

    /// Update an indicator's metadata (rating, confidence, description, ...)
    pub async fn update_indicator(
        &self,
        id: &str,
        indicator_type: &str,
        changes: &Indicator,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Updating indicator");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        let mut body = serde_json::to_value(changes).map_err(TcError::Serialization)?;
        if let Value::Object(fields) = &mut body {
            fields.remove("summary");
            fields.remove("type");
        }

        self.api.put(url, owner, resource.envelope_key, Some(body)).await
    }

    pub async fn delete_indicator(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Deleting indicator");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        self.api.delete(url, owner).await
    }

    /// Read one indicator; `{}` when the response carries none
    pub async fn get_by_id(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Reading indicator");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        self.api.get(url, owner, Some(resource.envelope_key)).await
    }

    /// Read one indicator as a record; family fields land in `extra`
    pub async fn get_indicator(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Indicator> {
        from_value(self.get_by_id(id, indicator_type, owner).await?)
    }

    /// Read an indicator with `includeAdditional=true`, returning `data` whole
    pub async fn get_additional_data(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Reading additional indicator data");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id])?;
        let response = self
            .api
            .request(Method::GET, url)
            .owner(owner)
            .include_additional()
            .send()
            .await?;

        Ok(Envelope::from_body(response).into_data())
    }

    /// List indicators of a type (`Indicator` lists every type).
    ///
    /// Returns `data` as sent. With `normalize`, records are rewritten to carry
    /// `type` and `summary` and family wrappers are lifted to `indicator`.
    pub async fn get_all(
        &self,
        indicator_type: &str,
        options: &ListOptions,
        normalize: bool,
    ) -> TcResult<Value> {
        tracing::debug!(resource = indicator_type, normalize, "Listing indicators");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[])?;
        let response = self
            .api
            .request(Method::GET, url)
            .list_options(options)
            .send()
            .await?;
        let data = Envelope::from_body(response).into_data();

        if normalize {
            Ok(normalize_listing(data, resource))
        } else {
            Ok(data)
        }
    }

    pub async fn get_observations(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Reading observations");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "observations"])?;
        self.api.get(url, owner, Some("observation")).await
    }

    /// Record sightings of an indicator
    pub async fn add_observation(
        &self,
        id: &str,
        indicator_type: &str,
        observation: &Observation,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(
            id,
            resource = indicator_type,
            count = observation.count,
            "Adding observation"
        );

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "observations"])?;
        let body = serde_json::to_value(observation).map_err(TcError::Serialization)?;
        self.api.post(url, owner, Some(body)).await
    }

    pub async fn get_observation_count(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Reading observation count");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "observationCount"])?;
        self.api.get(url, owner, Some("observationCount")).await
    }

    /// Flag an indicator as a false positive
    pub async fn report_false_positive(
        &self,
        id: &str,
        indicator_type: &str,
        owner: Option<&str>,
    ) -> TcResult<Value> {
        tracing::debug!(id, resource = indicator_type, "Reporting false positive");

        let resource = ResourceType::lookup(indicator_type)?;
        let url = self.api.endpoint(resource.uri, &[id, "falsePositive"])?;
        self.api
            .post_with_data_key(url, owner, "falsePositive", None)
            .await
    }
}

/// JSON body for creating `indicator` as `resource`
fn wire_body(indicator: &Indicator, resource: &ResourceType) -> TcResult<Value> {
    let value = match indicator.summary.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => return Err(TcError::MissingIndicatorValue(resource.name.to_string())),
    };
    let (field, value) = select_indicator_field(resource, value)?;

    let mut body = serde_json::to_value(indicator).map_err(TcError::Serialization)?;
    if let Value::Object(fields) = &mut body {
        fields.remove("summary");
        fields.insert(field.to_string(), json!(value));
    }

    Ok(body)
}

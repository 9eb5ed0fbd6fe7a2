//! Data models for ThreatConnect entities

pub mod indicator_utils;
pub mod resource_type;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TcError, TcResult};

pub use resource_type::ResourceType;

/// Owner scope (Organization, Community, Source, Individual)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
}

/// Indicator record
///
/// `summary` carries the indicator value whatever wire field the family stores
/// it under (`ip`, `hostName`, `text`, `address`, or the file hashes).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub indicator_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_assess_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_assess_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_observed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_positive_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_positive_last_reported: Option<DateTime<Utc>>,
    /// Family-specific fields (`ip`, `md5`, `dnsActive`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Indicator {
    /// New indicator of the given logical type with its value
    pub fn new(indicator_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            indicator_type: Some(indicator_type.into()),
            summary: Some(summary.into()),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_confidence(mut self, confidence: i32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Group record; subtype-specific fields (Document `fileName`, Incident
/// `eventDate`, Task `dueDate`, ...) land in `extra`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub attribute_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displayed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(attribute_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_type: Some(attribute_type.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

/// Where and when a file indicator was seen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileOccurrence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub file_name: String,
    pub path: String,
    pub date: DateTime<Utc>,
}

impl FileOccurrence {
    pub fn new(file_name: impl Into<String>, path: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            path: path.into(),
            date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_observed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Victim {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suborg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VictimAsset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response wrapper shared by all ThreatConnect endpoints: `{status, data}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Read the envelope out of a parsed body; bodies without one yield an empty envelope
    pub fn from_body(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// `data[key]`, or `default` when the key is absent or null
    pub fn into_field_or(self, key: &str, default: Value) -> Value {
        match self.data {
            Some(Value::Object(mut data)) => match data.remove(key) {
                Some(Value::Null) | None => default,
                Some(value) => value,
            },
            _ => default,
        }
    }

    /// `data[key]`, or `{}` when absent
    pub fn into_field(self, key: &str) -> Value {
        self.into_field_or(key, empty_object())
    }

    /// `data` itself, or `{}` when absent
    pub fn into_data(self) -> Value {
        match self.data {
            Some(Value::Null) | None => empty_object(),
            Some(data) => data,
        }
    }
}

/// `{}`
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Convert a raw response value into a typed record
pub fn from_value<T: DeserializeOwned>(value: Value) -> TcResult<T> {
    serde_json::from_value(value).map_err(TcError::Serialization)
}

/// Convert an unwrapped listing into records.
///
/// `null` and `{}` are empty listings; a lone object is a single record.
pub fn records_from_value<T: DeserializeOwned>(value: Value) -> TcResult<Vec<T>> {
    match value {
        Value::Null => Ok(vec![]),
        Value::Object(object) if object.is_empty() => Ok(vec![]),
        Value::Array(items) => items.into_iter().map(from_value).collect(),
        record => Ok(vec![from_value(record)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_envelope_key() {
        let body = json!({"status": "Success", "data": {"indicator": [{"summary": "1.1.1.1"}]}});
        assert_eq!(
            Envelope::from_body(body).into_field("indicator"),
            json!([{"summary": "1.1.1.1"}])
        );
    }

    #[test]
    fn missing_key_yields_empty_object() {
        let body = json!({"status": "Success", "data": {}});
        assert_eq!(Envelope::from_body(body).into_field("indicator"), json!({}));
        assert_eq!(Envelope::from_body(json!("nope")).into_field("indicator"), json!({}));
        assert_eq!(Envelope::from_body(json!({"status": "Success"})).into_data(), json!({}));
    }

    #[test]
    fn indicator_extra_fields_round_into_records() {
        let record: Indicator = from_value(json!({
            "id": 54321,
            "type": "Address",
            "ownerName": "Example Organization",
            "dateAdded": "2016-07-13T17:50:17Z",
            "rating": 3.0,
            "confidence": 55,
            "ip": "0.0.0.0",
            "summary": "0.0.0.0"
        }))
        .unwrap();

        assert_eq!(record.indicator_type.as_deref(), Some("Address"));
        assert_eq!(record.confidence, Some(55));
        assert_eq!(record.extra.get("ip"), Some(&json!("0.0.0.0")));
    }

    #[test]
    fn listings_decode_into_records() {
        let owners: Vec<Owner> = records_from_value(json!([
            {"id": 1, "name": "Example Org", "type": "Organization"},
            {"id": 2, "name": "Common Community", "type": "Community"}
        ]))
        .unwrap();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[1].owner_type.as_deref(), Some("Community"));

        let single: Vec<Tag> = records_from_value(json!({"name": "APT 28"})).unwrap();
        assert_eq!(single[0].name.as_deref(), Some("APT 28"));

        assert!(records_from_value::<Tag>(json!({})).unwrap().is_empty());
        assert!(records_from_value::<Tag>(Value::Null).unwrap().is_empty());
        assert!(matches!(
            records_from_value::<Owner>(json!(["not an owner"])),
            Err(TcError::Serialization(_))
        ));
    }

    #[test]
    fn occurrence_serializes_iso_date() {
        let date = DateTime::parse_from_rfc3339("2017-07-13T05:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let occurrence = FileOccurrence::new("win999301.dll", "C:\\Windows\\System", date);
        let body = serde_json::to_value(occurrence).unwrap();

        assert_eq!(body["fileName"], "win999301.dll");
        assert_eq!(body["date"], "2017-07-13T05:00:00Z");
        assert!(body.get("id").is_none());
    }
}

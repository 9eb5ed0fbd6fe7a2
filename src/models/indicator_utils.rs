// src/models/indicator_utils.rs

use serde_json::{Map, Value};

use crate::error::{TcError, TcResult};
use crate::models::ResourceType;

const HASH_FIELDS: [&str; 3] = ["md5", "sha1", "sha256"];

/// Pick the wire field for an indicator value and normalize the value for it.
///
/// Single-candidate types post the value as-is. File indicators choose the hash
/// field from the value length (32 md5, 40 sha1, 64 sha256). Hashes must be hex
/// and are always upper-cased.
pub fn select_indicator_field(
    resource: &ResourceType,
    value: &str,
) -> TcResult<(&'static str, String)> {
    if resource.indicator_fields.is_empty() {
        return Err(TcError::NotAnIndicator(resource.name.to_string()));
    }
    if value.is_empty() {
        return Err(TcError::MissingIndicatorValue(resource.name.to_string()));
    }

    let field = match resource.indicator_fields {
        [single] => *single,
        candidates => {
            ensure_hex(value)?;
            let field = hash_field_for_length(value.len())?;
            if !candidates.contains(&field) {
                return Err(TcError::AmbiguousHashLength {
                    length: value.len(),
                });
            }
            field
        }
    };

    if is_hash_field(field) {
        ensure_hex(value)?;
        Ok((field, value.to_ascii_uppercase()))
    } else {
        Ok((field, value.to_string()))
    }
}

/// Hash field implied by a hex digest length
pub fn hash_field_for_length(length: usize) -> TcResult<&'static str> {
    match length {
        32 => Ok("md5"),
        40 => Ok("sha1"),
        64 => Ok("sha256"),
        length => Err(TcError::AmbiguousHashLength { length }),
    }
}

fn ensure_hex(value: &str) -> TcResult<()> {
    if value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(TcError::InvalidHash(value.to_string()))
    }
}

fn is_hash_field(field: &str) -> bool {
    HASH_FIELDS.contains(&field)
}

/// Composite file summary `md5 : sha1 : sha256`.
///
/// Missing hashes keep their position; only the first populated hash carries
/// no leading space, e.g. `AB12 : : ` or ` : : CD34`.
pub fn file_summary(md5: Option<&str>, sha1: Option<&str>, sha256: Option<&str>) -> String {
    let middle = match sha1 {
        Some(sha1) if !sha1.is_empty() => format!(" {} ", sha1.to_uppercase()),
        _ => " ".to_string(),
    };

    format!(
        "{} :{}: {}",
        md5.unwrap_or_default().to_uppercase(),
        middle,
        sha256.unwrap_or_default().to_uppercase()
    )
}

/// Rewrite a listing payload so every indicator record carries `type` and `summary`.
///
/// Family wrappers (`address`, `host`, `file`, `url`) are lifted to `indicator`;
/// records with `ip`, `hostName`, `text`, `address` (email addresses) or file
/// hashes get their summary from that field. Normalizing an already normalized
/// payload changes nothing.
pub fn normalize_listing(data: Value, resource: &ResourceType) -> Value {
    match data {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_listing(item, resource))
                .collect(),
        ),
        Value::Object(object) => {
            let object = object
                .into_iter()
                .map(|(key, value)| (key, normalize_listing(value, resource)))
                .collect();
            Value::Object(normalize_object(object, resource))
        }
        other => other,
    }
}

fn normalize_object(mut object: Map<String, Value>, resource: &ResourceType) -> Map<String, Value> {
    let keys: Vec<String> = object.keys().cloned().collect();

    for key in keys {
        match key.as_str() {
            "address" if resource.type_name == "EmailAddress" => {
                if let Some(value) = object.get("address").cloned() {
                    set_identity(&mut object, value, "EmailAddress");
                }
            }
            "address" | "file" | "host" | "url" => {
                if let Some(value) = object.remove(&key) {
                    object.insert("indicator".to_string(), value);
                }
            }
            "emailAddress" => {
                if let Some(value) = object.get("emailAddress").cloned() {
                    object.insert("indicator".to_string(), value);
                }
            }
            "hostName" => {
                if let Some(value) = object.get("hostName").cloned() {
                    set_identity(&mut object, value, "Host");
                }
            }
            "ip" => {
                if let Some(value) = object.get("ip").cloned() {
                    set_identity(&mut object, value, "Address");
                }
            }
            "text" => {
                if let Some(value) = object.get("text").cloned() {
                    set_identity(&mut object, value, "URL");
                }
            }
            _ => {}
        }
    }

    if HASH_FIELDS.iter().any(|f| object.get(*f).is_some_and(Value::is_string)) {
        for field in HASH_FIELDS {
            if let Some(Value::String(hash)) = object.get_mut(field) {
                *hash = hash.to_uppercase();
            }
        }

        let summary = file_summary(
            object.get("md5").and_then(Value::as_str),
            object.get("sha1").and_then(Value::as_str),
            object.get("sha256").and_then(Value::as_str),
        );
        object.insert("summary".to_string(), Value::String(summary));
        object.insert("type".to_string(), Value::String("File".to_string()));
    }

    object
}

fn set_identity(object: &mut Map<String, Value>, summary: Value, type_name: &str) {
    object.insert("summary".to_string(), summary);
    object.insert("type".to_string(), Value::String(type_name.to_string()));
}

//! Registry of ThreatConnect resource types
//!
//! Maps a logical entity name (`Address`, `Incident`, `Tag`, ...) to the URI
//! template it lives under and the key its payload is wrapped in inside the
//! response envelope.

use std::collections::HashSet;

use crate::error::{TcError, TcResult};

/// Static description of one ThreatConnect resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Logical name used for lookups
    pub name: &'static str,
    /// URI segment relative to the API base path, without surrounding slashes
    pub uri: &'static str,
    /// Key of the payload inside `data` for single-record responses
    pub envelope_key: &'static str,
    /// Wire field an indicator value is posted under, when fixed
    pub post_field: Option<&'static str>,
    /// Candidate wire fields holding the indicator value, in priority order
    pub indicator_fields: &'static [&'static str],
    /// Value of the `type` field ThreatConnect reports for this resource
    pub type_name: &'static str,
    /// Key wrapping listing results inside `data`; `None` returns `data` itself
    pub listing_key: Option<&'static str>,
}

impl ResourceType {
    const fn group(name: &'static str, uri: &'static str, envelope_key: &'static str) -> Self {
        Self {
            name,
            uri,
            envelope_key,
            post_field: None,
            indicator_fields: &[],
            type_name: name,
            listing_key: None,
        }
    }

    const fn indicator(
        name: &'static str,
        uri: &'static str,
        envelope_key: &'static str,
        post_field: Option<&'static str>,
        indicator_fields: &'static [&'static str],
        type_name: &'static str,
    ) -> Self {
        Self {
            name,
            uri,
            envelope_key,
            post_field,
            indicator_fields,
            type_name,
            listing_key: None,
        }
    }

    const fn with_type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    const fn with_listing_key(mut self, listing_key: &'static str) -> Self {
        self.listing_key = Some(listing_key);
        self
    }

    /// Find the descriptor for a logical type name (case-sensitive)
    pub fn lookup(name: &str) -> TcResult<&'static ResourceType> {
        RESOURCE_TYPES
            .iter()
            .find(|rt| rt.name == name)
            .ok_or_else(|| TcError::UnknownResourceType(name.to_string()))
    }

    /// All registered resource types
    pub fn all() -> &'static [ResourceType] {
        RESOURCE_TYPES
    }

    /// Whether values of this type are indicators that can be created directly
    pub fn is_indicator(&self) -> bool {
        !self.indicator_fields.is_empty()
    }

    /// Check the registry for missing or malformed entries
    pub fn validate() -> TcResult<()> {
        let mut seen = HashSet::new();

        for rt in RESOURCE_TYPES {
            if rt.name.is_empty() || rt.envelope_key.is_empty() || rt.type_name.is_empty() {
                return Err(TcError::InvalidRegistry(format!(
                    "{:?} has an empty required field",
                    rt.name
                )));
            }
            if rt.uri.starts_with('/')
                || rt.uri.ends_with('/')
                || rt.uri.split('/').any(str::is_empty)
            {
                return Err(TcError::InvalidRegistry(format!(
                    "{} has malformed uri {:?}",
                    rt.name, rt.uri
                )));
            }
            if rt.post_field.is_some_and(|f| !rt.indicator_fields.contains(&f)) {
                return Err(TcError::InvalidRegistry(format!(
                    "{} posts to a field outside its indicator fields",
                    rt.name
                )));
            }
            if !seen.insert(rt.name) {
                return Err(TcError::InvalidRegistry(format!("{} is registered twice", rt.name)));
            }
        }

        Ok(())
    }
}

static RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::indicator(
        "Address",
        "v2/indicators/addresses",
        "address",
        Some("ip"),
        &["ip"],
        "Address",
    ),
    ResourceType::group("Adversary", "v2/groups/adversaries", "adversary"),
    ResourceType::group("Campaign", "v2/groups/campaigns", "campaign"),
    ResourceType::group("Document", "v2/groups/documents", "document"),
    ResourceType::group("Email", "v2/groups/emails", "email"),
    ResourceType::indicator(
        "EmailAddress",
        "v2/indicators/emailAddresses",
        "emailAddress",
        Some("address"),
        &["address"],
        "EmailAddress",
    ),
    ResourceType::group("ExchangeDb", "v2/exchange/db", "exchangeDb"),
    ResourceType::indicator(
        "File",
        "v2/indicators/files",
        "file",
        None,
        &["md5", "sha1", "sha256"],
        "File",
    ),
    ResourceType::group("Group", "v2/groups", "group"),
    ResourceType::indicator(
        "Host",
        "v2/indicators/hosts",
        "host",
        Some("hostName"),
        &["hostName"],
        "Host",
    ),
    ResourceType::group("Incident", "v2/groups/incidents", "incident"),
    ResourceType::indicator(
        "Indicator",
        "v2/indicators",
        "indicator",
        Some("summary"),
        &["summary"],
        "Indicator",
    ),
    ResourceType::group("IndicatorType", "v2/indicatorTypes", "indicatorType"),
    ResourceType::indicator("Md5", "v2/indicators/files", "file", Some("md5"), &["md5"], "File"),
    ResourceType::group("Owner", "v2/owners", "owner").with_listing_key("owner"),
    ResourceType::group("SecurityLabel", "v2/securityLabels", "securityLabel")
        .with_listing_key("securityLabel"),
    ResourceType::indicator("Sha1", "v2/indicators/files", "file", Some("sha1"), &["sha1"], "File"),
    ResourceType::indicator(
        "Sha256",
        "v2/indicators/files",
        "file",
        Some("sha256"),
        &["sha256"],
        "File",
    ),
    ResourceType::group("Signature", "v2/groups/signatures", "signature"),
    ResourceType::group("Spaces", "v2/exchange/spaces", "space"),
    ResourceType::group("Tag", "v2/tags", "tag"),
    ResourceType::group("Task", "v2/tasks", "task"),
    ResourceType::group("Threat", "v2/groups/threats", "threat"),
    ResourceType::indicator("Url", "v2/indicators/urls", "url", Some("text"), &["text"], "URL"),
    ResourceType::group("Victim", "v2/victims", "victim"),
    ResourceType::group("VictimAsset", "v2/victimAssets", "victimAsset"),
    ResourceType::group(
        "VictimAssetEmailAddresses",
        "v2/victimAssets/emailAddresses",
        "victimEmailAddress",
    )
    .with_type_name("EmailAddress"),
    ResourceType::group(
        "VictimAssetNetworkAccounts",
        "v2/victimAssets/networkAccounts",
        "victimNetworkAccount",
    )
    .with_type_name("NetworkAccount"),
    ResourceType::group("VictimAssetPhoneNumbers", "v2/victimAssets/phoneNumbers", "victimPhone")
        .with_type_name("Phone"),
    ResourceType::group(
        "VictimAssetSocialNetworks",
        "v2/victimAssets/socialNetworks",
        "victimSocialNetwork",
    )
    .with_type_name("SocialNetwork"),
    ResourceType::group("VictimAssetWebSites", "v2/victimAssets/webSites", "victimWebSite")
        .with_type_name("WebSite"),
    ResourceType::group("WhoAmI", "v2/whoami", "user"),
];

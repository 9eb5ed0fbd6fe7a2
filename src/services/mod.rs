//! Entity services for the ThreatConnect API

pub mod associations;
pub mod attributes;
pub mod exchange_db;
pub mod file_indicators;
pub mod groups;
pub mod indicators;
pub mod owners;
pub mod security_labels;
pub mod spaces;
pub mod tags;
pub mod types;
pub mod whoami;

use std::sync::Arc;

use crate::config::{ApiContext, ClientConfig};
use crate::error::TcResult;
use crate::models::ResourceType;
use crate::request::{ApiClient, ReqwestTransport, Transport};

pub use associations::AssociationService;
pub use attributes::AttributeService;
pub use exchange_db::{ExchangeDbService, ExchangeDomain};
pub use file_indicators::FileIndicatorService;
pub use groups::GroupService;
pub use indicators::IndicatorService;
pub use owners::OwnerService;
pub use security_labels::SecurityLabelService;
pub use spaces::SpacesService;
pub use tags::TagService;
pub use types::TypeService;
pub use whoami::WhoAmIService;

/// Entry point handing out one service per entity family.
///
/// Services share the transport and context, so handing them out is cheap.
#[derive(Clone)]
pub struct TcClient {
    api: ApiClient,
}

impl TcClient {
    /// Build a client over any transport and context; fails if the resource registry is malformed
    pub fn new(transport: Arc<dyn Transport>, context: Arc<dyn ApiContext>) -> TcResult<Self> {
        ResourceType::validate()?;

        tracing::info!(resource_types = ResourceType::all().len(), "ThreatConnect client ready");

        Ok(Self {
            api: ApiClient::new(transport, context),
        })
    }

    /// Client over HTTPS using fixed settings
    pub fn from_config(config: ClientConfig) -> TcResult<Self> {
        Self::new(Arc::new(ReqwestTransport::new()), Arc::new(config))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn indicators(&self) -> IndicatorService {
        IndicatorService::new(self.api.clone())
    }

    pub fn file_indicators(&self) -> FileIndicatorService {
        FileIndicatorService::new(self.api.clone())
    }

    pub fn groups(&self) -> GroupService {
        GroupService::new(self.api.clone())
    }

    pub fn owners(&self) -> OwnerService {
        OwnerService::new(self.api.clone())
    }

    pub fn tags(&self) -> TagService {
        TagService::new(self.api.clone())
    }

    pub fn security_labels(&self) -> SecurityLabelService {
        SecurityLabelService::new(self.api.clone())
    }

    pub fn attributes(&self) -> AttributeService {
        AttributeService::new(self.api.clone())
    }

    pub fn associations(&self) -> AssociationService {
        AssociationService::new(self.api.clone())
    }

    pub fn exchange_db(&self) -> ExchangeDbService {
        ExchangeDbService::new(self.api.clone())
    }

    pub fn spaces(&self) -> SpacesService {
        SpacesService::new(self.api.clone())
    }

    pub fn whoami(&self) -> WhoAmIService {
        WhoAmIService::new(self.api.clone())
    }

    pub fn types(&self) -> TypeService {
        TypeService::new(self.api.clone())
    }
}

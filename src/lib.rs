//! tc-api-client
//!
//! Typed async client for the ThreatConnect v2 REST API: indicators, groups,
//! owners, tags, security labels, attributes, associations, file occurrences,
//! the exchange data store and space element storage.
//!
//! ```no_run
//! # async fn run() -> tc_api_client::TcResult<()> {
//! use tc_api_client::{ClientConfig, ListOptions, TcClient};
//!
//! let client = TcClient::from_config(ClientConfig::from_env()?)?;
//! let hosts = client
//!     .indicators()
//!     .get_all("Host", &ListOptions::new().owner("Example Org"), true)
//!     .await?;
//! println!("{hosts}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod services;

pub use config::{ApiContext, ClientConfig, EnvContext};
pub use error::{TcError, TcResult};
pub use models::{
    Attribute, Envelope, FileOccurrence, Group, Indicator, Observation, Owner, ResourceType,
    SecurityLabel, Tag, Victim, VictimAsset,
};
pub use request::{ApiClient, ListOptions, ReqwestTransport, Transport};
pub use services::{ExchangeDomain, TcClient};

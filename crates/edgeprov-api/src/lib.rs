// edgeprov-api: Async Rust client for the SD-WAN orchestrator REST API

pub mod appliance;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod preconfig;
pub mod transport;

pub use auth::AuthMode;
pub use client::OrchClient;
pub use error::Error;
pub use models::{Appliance, ApplianceInfo, DeniedAppliance, Preconfig, PreconfigUpload};
pub use transport::{TlsMode, TransportConfig};

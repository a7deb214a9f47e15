//! aoiscan service - feature service adapters
//!
//! This crate provides implementations of the `FeatureService` port: an
//! ArcGIS REST client, an in-memory/GeoJSON service, and a router choosing
//! between them by layer URL.

pub mod arcgis;
pub mod esri;
pub mod memory;
pub mod routing;

pub use arcgis::{ArcGisConfig, ArcGisFeatureService};
pub use memory::{MemoryFeature, MemoryFeatureService, MemoryLayer};
pub use routing::RoutingFeatureService;

use aoiscan_core::config::LayeredConfig;
use aoiscan_core::error::Result;

/// The service used by the CLI: local files plus ArcGIS layers
pub type DefaultFeatureService = RoutingFeatureService<ArcGisFeatureService>;

/// Build the default service from runtime configuration
pub fn default_service(config: &LayeredConfig) -> Result<DefaultFeatureService> {
    Ok(RoutingFeatureService::new(remote_service(config)?))
}

/// ArcGIS layers only; local paths and `file://` URLs fail to load
///
/// Used where layer URLs come from untrusted callers, such as the HTTP API.
pub fn remote_service(config: &LayeredConfig) -> Result<ArcGisFeatureService> {
    ArcGisFeatureService::new(ArcGisConfig::from_layered(config))
}

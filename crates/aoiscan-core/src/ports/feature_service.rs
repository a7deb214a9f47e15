use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{FeatureSet, LayerHandle, LayerQuery};

/// Port for remote feature services
///
/// Errors returned here are per-layer failures: callers skip the layer and
/// carry on with the rest.
#[async_trait]
pub trait FeatureService: Send + Sync {
    /// Load layer metadata for an endpoint
    async fn load_layer(&self, url: &str) -> Result<LayerHandle>;

    /// Query attribute rows of features matching the query's area
    async fn query_intersecting(&self, layer: &LayerHandle, query: &LayerQuery)
        -> Result<FeatureSet>;
}

#[async_trait]
impl<T: FeatureService + ?Sized> FeatureService for Arc<T> {
    async fn load_layer(&self, url: &str) -> Result<LayerHandle> {
        (**self).load_layer(url).await
    }

    async fn query_intersecting(
        &self,
        layer: &LayerHandle,
        query: &LayerQuery,
    ) -> Result<FeatureSet> {
        (**self).query_intersecting(layer, query).await
    }
}

#[async_trait]
impl<T: FeatureService + ?Sized> FeatureService for Box<T> {
    async fn load_layer(&self, url: &str) -> Result<LayerHandle> {
        (**self).load_layer(url).await
    }

    async fn query_intersecting(
        &self,
        layer: &LayerHandle,
        query: &LayerQuery,
    ) -> Result<FeatureSet> {
        (**self).query_intersecting(layer, query).await
    }
}

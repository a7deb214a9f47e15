pub mod analysis;
pub mod geometry;
pub mod layer;

pub use analysis::{
    total_features, AnalysisResult, AttributeMap, FailureStage, LayerFailure, UNNAMED_LAYER,
};
pub use geometry::{
    Envelope, Geometry, MapView, Region, SearchArea, SpatialRelationship, Viewport,
};
pub use layer::{FeatureSet, LayerHandle, LayerQuery};

//! Dispatch between local GeoJSON files and remote feature services

use async_trait::async_trait;
use aoiscan_core::error::{AoiscanError, Result};
use aoiscan_core::models::{FeatureSet, LayerHandle, LayerQuery};
use aoiscan_core::ports::FeatureService;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::sync::Mutex;

use crate::memory::{MemoryFeatureService, MemoryLayer};

/// Local file path for a layer URL, when it names one
///
/// `file://` URLs and plain paths ending in `.geojson` or `.json` are local.
pub fn local_path(url: &str) -> Option<PathBuf> {
    if url.starts_with("file://") {
        return url::Url::parse(url).ok().and_then(|u| u.to_file_path().ok());
    }
    if url.contains("://") {
        return None;
    }

    let lower = url.to_lowercase();
    if lower.ends_with(".geojson") || lower.ends_with(".json") {
        Some(PathBuf::from(url))
    } else {
        None
    }
}

/// Feature service that serves local GeoJSON layers itself and forwards
/// everything else to `remote`
///
/// A local file is read again whenever its modification time changes.
pub struct RoutingFeatureService<R> {
    remote: R,
    local: MemoryFeatureService,
    loaded: Mutex<HashMap<String, SystemTime>>,
}

impl<R: FeatureService> RoutingFeatureService<R> {
    pub fn new(remote: R) -> Self {
        Self { remote, local: MemoryFeatureService::new(), loaded: Mutex::new(HashMap::new()) }
    }

    async fn ensure_local(&self, url: &str, path: PathBuf) -> Result<()> {
        // Held across the read so concurrent runs load a file once
        let mut loaded = self.loaded.lock().await;

        let modified = tokio::fs::metadata(&path).await.and_then(|m| m.modified()).ok();
        if let Some(modified) = modified {
            if loaded.get(url) == Some(&modified) && self.local.contains(url) {
                return Ok(());
            }
        }

        let layer = MemoryLayer::from_geojson_file(&path).await.map_err(|e| AoiscanError::LayerLoad {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(url, path = %path.display(), features = layer.features.len(), "Loaded local layer");
        self.local.register(url, layer);
        match modified {
            Some(modified) => loaded.insert(url.to_string(), modified),
            None => loaded.remove(url),
        };
        Ok(())
    }
}

#[async_trait]
impl<R: FeatureService> FeatureService for RoutingFeatureService<R> {
    async fn load_layer(&self, url: &str) -> Result<LayerHandle> {
        match local_path(url) {
            Some(path) => {
                self.ensure_local(url, path).await?;
                self.local.load_layer(url).await
            }
            None => self.remote.load_layer(url).await,
        }
    }

    async fn query_intersecting(&self, layer: &LayerHandle, query: &LayerQuery) -> Result<FeatureSet> {
        if self.local.contains(&layer.url) {
            self.local.query_intersecting(layer, query).await
        } else {
            self.remote.query_intersecting(layer, query).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_local_path_detection() {
        assert_eq!(local_path("data/wells.geojson"), Some(PathBuf::from("data/wells.geojson")));
        assert_eq!(local_path("/tmp/W.JSON"), Some(PathBuf::from("/tmp/W.JSON")));
        assert_eq!(local_path("file:///tmp/wells.geojson").as_deref(), Some(Path::new("/tmp/wells.geojson")));
        assert_eq!(local_path("https://h/arcgis/rest/services/W/FeatureServer/0"), None);
        assert_eq!(local_path("https://h/data.json"), None);
    }

    #[tokio::test]
    async fn test_routes_local_and_remote() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("parcels.geojson");
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {"P": 1}}
            ]}"#,
        )
        .unwrap();

        let remote = MemoryFeatureService::new();
        remote.register("https://h/FeatureServer/0", MemoryLayer::new("Remote", vec![]));
        let service = RoutingFeatureService::new(remote);

        let local_url = path.to_string_lossy().to_string();
        let local = service.load_layer(&local_url).await.unwrap();
        assert_eq!(local.title.as_deref(), Some("parcels"));
        let set = service.query_intersecting(&local, &LayerQuery::default()).await.unwrap();
        assert_eq!(set.features.len(), 1);

        let remote = service.load_layer("https://h/FeatureServer/0").await.unwrap();
        assert_eq!(remote.title.as_deref(), Some("Remote"));
    }

    fn write_points(path: &Path, count: usize, modified: SystemTime) {
        let features: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"type": "Feature", "geometry": {{"type": "Point", "coordinates": [{}, 0]}}, "properties": {{"ID": {}}}}}"#,
                    i, i
                )
            })
            .collect();
        std::fs::write(path, format!(r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features.join(",")))
            .unwrap();
        std::fs::File::options().write(true).open(path).unwrap().set_modified(modified).unwrap();
    }

    async fn feature_count(service: &RoutingFeatureService<MemoryFeatureService>, url: &str) -> usize {
        let layer = service.load_layer(url).await.unwrap();
        service.query_intersecting(&layer, &LayerQuery::default()).await.unwrap().features.len()
    }

    #[tokio::test]
    async fn test_local_layer_reloads_when_file_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wells.geojson");
        let url = path.to_string_lossy().to_string();
        let first = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let second = first + std::time::Duration::from_secs(60);

        let service = RoutingFeatureService::new(MemoryFeatureService::new());

        write_points(&path, 1, first);
        assert_eq!(feature_count(&service, &url).await, 1);

        write_points(&path, 2, second);
        assert_eq!(feature_count(&service, &url).await, 2);

        // Same modification time: the cached layer is served
        write_points(&path, 3, second);
        assert_eq!(feature_count(&service, &url).await, 2);
    }

    #[tokio::test]
    async fn test_missing_local_file_is_load_failure() {
        let service = RoutingFeatureService::new(MemoryFeatureService::new());
        let err = service.load_layer("/definitely/not/here.geojson").await.unwrap_err();
        assert!(matches!(err, AoiscanError::LayerLoad { .. }));
    }
}

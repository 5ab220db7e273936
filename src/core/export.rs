use crate::core::{BoundarySnapshot, Storage};
use crate::utils::error::Result;
use uuid::Uuid;

pub fn snapshot_file_name(id: Uuid) -> String {
    format!("{}.json", id)
}

/// Writes the snapshot as-is, pretty-printed JSON, and returns the relative file name.
pub async fn export_snapshot<S: Storage>(storage: &S, snapshot: &BoundarySnapshot) -> Result<String> {
    let file_name = snapshot_file_name(snapshot.id);
    let json = serde_json::to_vec_pretty(snapshot)?;

    tracing::debug!(
        "Exporting boundary '{}' ({} points) to {}",
        snapshot.name,
        snapshot.points.len(),
        file_name
    );
    storage.write_file(&file_name, &json).await?;
    Ok(file_name)
}

pub async fn load_snapshot<S: Storage>(storage: &S, id: Uuid) -> Result<BoundarySnapshot> {
    let data = storage.read_file(&snapshot_file_name(id)).await?;
    Ok(serde_json::from_slice(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BoundarySession;
    use crate::domain::model::GeoPoint;
    use crate::utils::error::BoundaryError;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BoundaryError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn triangle() -> BoundarySession {
        let mut session = BoundarySession::create("triangle");
        for (lat, lon, acc) in [(6.428, -9.43, 1.5), (6.428, -9.429, 0.0), (6.429, -9.43, 2.5)] {
            session
                .add_point(GeoPoint::new(lat, lon, acc, Utc::now()).unwrap())
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_export_writes_snapshot_json() {
        let storage = MockStorage::new();
        let snapshot = triangle().snapshot();

        let file_name = export_snapshot(&storage, &snapshot).await.unwrap();
        assert_eq!(file_name, format!("{}.json", snapshot.id));

        let files = storage.files.lock().await;
        let json: serde_json::Value = serde_json::from_slice(&files[&file_name]).unwrap();
        assert_eq!(json["name"], "triangle");
        assert_eq!(json["status"], "Recording");
        assert_eq!(json["accuracy_tier"], "Excellent");
        assert_eq!(json["points"].as_array().unwrap().len(), 3);
        assert_eq!(json["points"][2]["order"], 3);
        assert!(json["centroid"]["latitude"].is_number());
    }

    #[tokio::test]
    async fn test_load_returns_exported_snapshot() {
        let storage = MockStorage::new();
        let snapshot = triangle().snapshot();
        export_snapshot(&storage, &snapshot).await.unwrap();

        let loaded = load_snapshot(&storage, snapshot.id).await.unwrap();
        assert_eq!(loaded.id, snapshot.id);
        assert_eq!(loaded.status, snapshot.status);
        assert_eq!(loaded.points.len(), 3);
        assert_eq!(loaded.points[1].id, snapshot.points[1].id);
        assert!((loaded.area_hectares - snapshot.area_hectares).abs() < 1e-9);
        assert_eq!(loaded.completed_at, None);
    }

    #[tokio::test]
    async fn test_load_missing_snapshot() {
        let storage = MockStorage::new();
        let err = load_snapshot(&storage, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BoundaryError::IoError(_)));
    }
}

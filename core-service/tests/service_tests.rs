//! Façade tests over an in-memory store

use async_trait::async_trait;
use bridge_traits::media::{MediaStore, MediaStoreError, MediaStoreResult, RemoteAsset};
use bridge_traits::picker::{MediaPicker, PickError};
use core_gallery::ReconcilerConfig;
use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
use core_service::{GalleryService, Selection, UploadStatus};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryStore {
    assets: Mutex<Vec<RemoteAsset>>,
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn list(&self, limit: u32) -> MediaStoreResult<Vec<RemoteAsset>> {
        let assets = self.assets.lock().unwrap();
        Ok(assets.iter().take(limit as usize).cloned().collect())
    }

    async fn upload(&self, local_uri: &str) -> MediaStoreResult<RemoteAsset> {
        let name = local_uri.rsplit('/').next().unwrap_or(local_uri);
        let asset = RemoteAsset::new(
            format!("Home/{}", name),
            format!("https://res.test/Home/{}", name),
        );
        self.assets.lock().unwrap().insert(0, asset.clone());
        Ok(asset)
    }

    async fn delete(&self, public_id: &str) -> MediaStoreResult<()> {
        let mut assets = self.assets.lock().unwrap();
        let before = assets.len();
        assets.retain(|a| a.public_id != public_id);
        if assets.len() == before {
            return Err(MediaStoreError::NotFound(public_id.to_string()));
        }
        Ok(())
    }
}

struct OnePicker(Mutex<Option<String>>);

#[async_trait]
impl MediaPicker for OnePicker {
    async fn pick_image(&self) -> Result<String, PickError> {
        self.0.lock().unwrap().take().ok_or(PickError::UserCancelled)
    }
}

fn service(pick: Option<&str>) -> GalleryService {
    GalleryService::with_store(
        Arc::new(MemoryStore::default()),
        Arc::new(OnePicker(Mutex::new(pick.map(str::to_string)))),
        Arc::new(EventBus::default()),
        ReconcilerConfig::default(),
    )
}

#[tokio::test]
async fn test_pick_upload_delete_round() {
    let service = service(Some("/tmp/cat.jpg"));
    let mut uploads = service
        .events()
        .filter(|e| matches!(e, CoreEvent::Gallery(GalleryEvent::UploadSucceeded { .. })));

    service.pick().await.unwrap();
    let asset = service.upload().await.unwrap();

    assert_eq!(asset.public_id, "Home/cat.jpg");
    assert_eq!(service.gallery().public_ids(), vec!["Home/cat.jpg"]);
    assert_eq!(service.selection(), Selection::Empty);
    assert_eq!(service.upload_status(), UploadStatus::Succeeded);
    assert!(uploads.try_recv().is_some());

    service.delete("Home/cat.jpg").await.unwrap();
    assert!(service.gallery().is_empty());

    service.refresh().await.unwrap();
    assert!(service.gallery().is_empty());
}

#[tokio::test]
async fn test_clones_share_state() {
    let service = service(Some("/tmp/dog.png"));
    let other = service.clone();

    service.pick().await.unwrap();
    assert!(!other.selection().is_empty());

    other.clear_selection();
    assert!(service.selection().is_empty());
}

#[tokio::test]
async fn test_cancelled_pick_is_quiet() {
    let service = service(None);
    let mut failures = service
        .events()
        .filter(|e| e.user_message().is_some());

    let err = service.pick().await.unwrap_err();

    assert!(err.as_gallery().map(|e| e.is_cancellation()).unwrap_or(false));
    assert!(failures.try_recv().is_none());
}

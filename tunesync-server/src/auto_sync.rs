use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use tunesync_core::modules::local_data::load_local_data;
use tunesync_core::modules::local_store::KeyValueStore;
use tunesync_core::sync::{SyncEngine, SyncOutcome};
use tunesync_core::AppResult;

/// Periodically run a full sync cycle while the stored settings enable it.
///
/// Settings are re-read on every tick, so toggling `webdav.auto_sync` takes
/// effect without a restart.
pub fn start_auto_sync(local: Arc<dyn KeyValueStore>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match sync_tick(Arc::clone(&local)).await {
                Ok(Some(outcome)) if outcome.upload.is_complete() => {
                    tracing::info!(
                        "🔄 Auto sync finished: {:?} wins, {} files written",
                        outcome.winner,
                        outcome.upload.written().len()
                    );
                },
                Ok(Some(outcome)) => {
                    if let Some(err) = outcome.upload.error {
                        tracing::warn!("⚠️ Auto sync upload incomplete: {}", err);
                    }
                },
                Ok(None) => {},
                Err(e) => tracing::warn!("⚠️ Auto sync failed: {}", e),
            }
        }
    });
    tracing::info!("✅ Auto sync task started (interval: {}s)", every.as_secs());
}

/// One tick. `None` when sync is not configured or disabled.
pub async fn sync_tick(local: Arc<dyn KeyValueStore>) -> AppResult<Option<SyncOutcome>> {
    let webdav = load_local_data(local.as_ref())?.settings.webdav;
    if !webdav.is_configured() || !webdav.auto_sync {
        tracing::debug!("Auto sync skipped (configured: {})", webdav.is_configured());
        return Ok(None);
    }

    let engine = SyncEngine::from_local_settings(local)?;
    engine.sync_once(webdav.conflict_strategy).await.map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tunesync_core::modules::local_data::save_local_data;
    use tunesync_core::modules::local_store::MemoryKeyValueStore;
    use tunesync_types::AppSnapshot;

    #[tokio::test]
    async fn test_unconfigured_is_skipped() {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        assert!(sync_tick(local).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disabled_auto_sync_is_skipped() {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut snapshot = AppSnapshot::new();
        snapshot.settings.webdav.url = "https://dav.example.com".to_string();
        snapshot.settings.webdav.auto_sync = false;
        save_local_data(local.as_ref(), &mut snapshot).unwrap();

        assert!(sync_tick(local).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enabled_with_bad_url_errors() {
        let local: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let mut snapshot = AppSnapshot::new();
        snapshot.settings.webdav.url = "ftp://dav.example.com".to_string();
        snapshot.settings.webdav.auto_sync = true;
        save_local_data(local.as_ref(), &mut snapshot).unwrap();

        assert!(sync_tick(local).await.is_err());
    }
}

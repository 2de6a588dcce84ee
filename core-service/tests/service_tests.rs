//! Integration tests for the service façade
//!
//! The HTTP transport is mocked, so these exercise the full path from
//! `SyncService::run` through the queue and connector down to the wire.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
    watcher::{FileWatcher, FilesystemEvent, WatchReceiver, WatchSignal},
};
use bytes::Bytes;
use core_runtime::config::SyncConfig;
use core_service::{CoreError, RunSummary, SyncDependencies, SyncMode, SyncService};
use mockall::mock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

struct ChannelWatcher {
    receiver: Mutex<Option<WatchReceiver>>,
}

impl ChannelWatcher {
    fn new() -> (Arc<Self>, mpsc::UnboundedSender<WatchSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                receiver: Mutex::new(Some(rx)),
            }),
            tx,
        )
    }
}

#[async_trait]
impl FileWatcher for ChannelWatcher {
    async fn watch(&self, _root: &Path) -> BridgeResult<WatchReceiver> {
        self.receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("already watching".to_string()))
    }

    async fn unwatch(&self, _root: &Path) -> BridgeResult<()> {
        Ok(())
    }
}

fn ok(body: &str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn service(config: SyncConfig, http: MockHttpClient) -> (SyncService, mpsc::UnboundedSender<WatchSignal>) {
    let (watcher, tx) = ChannelWatcher::new();
    let deps = SyncDependencies::new(Arc::new(http), watcher);
    (SyncService::new(config, deps).unwrap(), tx)
}

#[tokio::test]
async fn test_watch_requires_root() {
    let config = SyncConfig::builder().build().unwrap();
    let (service, _tx) = service(config, MockHttpClient::new());

    let result = service
        .run(SyncMode::Watch, CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[tokio::test]
async fn test_view_queries_configured_endpoint() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Get && request.url == "http://10.1.2.3:4000/v1/playlist"
        })
        .times(1)
        .returning(|_| Ok(ok(r#"{"playlists": [{"url": "/srv/media/Playlists/Jazz"}]}"#)));
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Get
                && request.url == "http://10.1.2.3:4000/v1/soundboard"
        })
        .times(1)
        .returning(|_| Ok(ok(r#"{"soundboards": []}"#)));

    let config = SyncConfig::builder()
        .host("10.1.2.3")
        .port(4000)
        .build()
        .unwrap();
    let (service, _tx) = service(config, http);

    match service.run(SyncMode::View, CancellationToken::new()).await {
        Ok(RunSummary::Viewed(snapshot)) => {
            assert_eq!(snapshot.playlists.len(), 1);
            assert!(snapshot.soundboards.is_empty());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_purge_listing_failure_aborts() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Err(BridgeError::ConnectionFailed("refused".to_string())));

    let config = SyncConfig::builder().build().unwrap();
    let (service, _tx) = service(config, http);

    let result = service.run(SyncMode::Purge, CancellationToken::new()).await;
    assert!(matches!(result, Err(CoreError::Sync(_))));
}

#[tokio::test]
async fn test_cancelled_purge_makes_no_calls() {
    // No expectations: any HTTP call fails the test.
    let config = SyncConfig::builder().build().unwrap();
    let (service, _tx) = service(config, MockHttpClient::new());

    let token = CancellationToken::new();
    token.cancel();

    let result = service.run(SyncMode::Purge, token).await;
    assert!(matches!(result, Err(CoreError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn test_backfill_dispatches_until_shutdown() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Put
                && request.url == "http://127.0.0.1:3333/v1/playlist/add"
                && serde_json::from_slice::<serde_json::Value>(
                    request.body.as_deref().unwrap_or_default(),
                )
                .map(|body| body["url"] == "/srv/media/Playlists/Jazz")
                .unwrap_or(false)
        })
        .times(1)
        .returning(|_| Ok(ok("{}")));

    let config = SyncConfig::builder()
        .root("/srv/media")
        .max_in_flight(2)
        .build()
        .unwrap();
    let (service, tx) = service(config, http);

    let token = CancellationToken::new();
    let run = tokio::spawn({
        let service = service.clone();
        let token = token.clone();
        async move { service.run(SyncMode::Backfill, token).await }
    });

    tx.send(WatchSignal::Event(FilesystemEvent::DirectoryAdded(
        PathBuf::from("/srv/media/Playlists/Jazz"),
    )))
    .unwrap();
    tx.send(WatchSignal::Event(FilesystemEvent::FileAdded(PathBuf::from(
        "/srv/media/README.md",
    ))))
    .unwrap();
    tx.send(WatchSignal::Ready).unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    token.cancel();

    match run.await.unwrap() {
        Ok(RunSummary::Watched(stats)) => {
            assert_eq!(stats.dispatched, 1);
            assert_eq!(stats.succeeded, 1);
            assert_eq!(stats.discarded_not_applicable, 1);
            assert_eq!(stats.pending, 0);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    drop(tx);
}

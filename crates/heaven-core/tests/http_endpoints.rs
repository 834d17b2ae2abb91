//! Fetcher, poller and resolver against a real HTTP server.

use std::sync::Arc;
use std::time::Duration;

use heaven_core::fetch::{Fetcher, HttpFetcher};
use heaven_core::protocol::{StreamHandle, TrackListState};
use heaven_core::stream::StreamUrlResolver;
use heaven_core::tracks::{PollerOptions, TrackListPoller};
use heaven_core::Error;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FALLBACK: &str = "https://fallback.example/stream";

fn fetcher() -> Arc<dyn Fetcher> {
    Arc::new(HttpFetcher::new("heavenradio-tests", Duration::from_secs(2)).unwrap())
}

async fn poll_once(server: &MockServer) -> TrackListState {
    let mut poller = TrackListPoller::new(
        fetcher(),
        PollerOptions::new(format!("{}/track/ckoi", server.uri())),
    );
    let mut rx = poller.subscribe();
    poller.start();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| !matches!(s, TrackListState::Loading)),
    )
    .await
    .expect("poll did not complete")
    .unwrap()
    .clone();
    poller.stop();
    state
}

#[tokio::test]
async fn test_poller_reads_listing_with_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/track/ckoi"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Ave Maria", "artist": "Schubert" },
            { "title": "Salve Regina", "album": "Vêpres" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    match poll_once(&server).await {
        TrackListState::Ready(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].display(), "Schubert – Ave Maria");
            assert_eq!(entries[1].album.as_deref(), Some("Vêpres"));
        }
        other => panic!("expected Ready, got {:?}", other),
    }
}

#[tokio::test]
async fn test_poller_reports_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(
        poll_once(&server).await,
        TrackListState::Failed("HTTP error: status 500".to_string())
    );
}

#[tokio::test]
async fn test_poller_reports_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    match poll_once(&server).await {
        TrackListState::Failed(description) => assert!(description.starts_with("parse error")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_refused_connection_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher()
        .get_text(&format!("http://{}/track/ckoi", addr), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new("heavenradio-tests", Duration::from_millis(300)).unwrap();
    let err = fetcher.get_text(&server.uri(), &[]).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_resolver_uses_first_http_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream.m3u"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("#comment\nhttp://stream.example/a\n"),
        )
        .mount(&server)
        .await;

    let resolver = StreamUrlResolver::new(
        fetcher(),
        format!("{}/stream.m3u", server.uri()),
        FALLBACK,
    );
    assert_eq!(
        resolver.resolve().await,
        StreamHandle::primary("http://stream.example/a")
    );
}

#[tokio::test]
async fn test_resolver_falls_back_without_stream_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("#EXTM3U\n#nothing here\n"))
        .mount(&server)
        .await;

    let resolver = StreamUrlResolver::new(fetcher(), server.uri(), FALLBACK);
    assert!(matches!(
        resolver.resolve_primary().await,
        Err(Error::Parse(_))
    ));
    assert_eq!(resolver.resolve().await, StreamHandle::fallback(FALLBACK));
}

#[tokio::test]
async fn test_resolver_falls_back_on_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = StreamUrlResolver::new(fetcher(), server.uri(), FALLBACK);
    assert_eq!(resolver.resolve().await, StreamHandle::fallback(FALLBACK));
}

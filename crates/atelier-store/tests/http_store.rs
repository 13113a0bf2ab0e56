//! End-to-end load cycles against a local HTTP content host.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use atelier_content::{defaults, ContentSnapshot, ResourceDescriptor};
use atelier_store::{
    ChangeSignal, ChangeTrigger, ContentStore, HttpSource, RefreshOutcome, RetrySource,
    TriggerConfig, TriggerOutcome, DEFAULT_SYNC_MARKER_PATH,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn http_store(server: &MockServer) -> Arc<ContentStore> {
    let source = HttpSource::with_timeout(server.uri(), Duration::from_secs(5)).unwrap();
    let source = RetrySource::new(Arc::new(source)).with_initial_delay(Duration::from_millis(1));
    Arc::new(
        ContentStore::new(Arc::new(source), ResourceDescriptor::default())
            .with_sync_marker(DEFAULT_SYNC_MARKER_PATH),
    )
}

#[tokio::test]
async fn test_empty_host_publishes_builtin_content() {
    let server = MockServer::start().await;
    let store = http_store(&server);

    assert!(store.snapshot().loading);
    store.refresh().await;

    let snapshot = store.snapshot();
    assert_eq!(*snapshot, ContentSnapshot::fallback());
    assert!(store.sync_marker().is_none());
    assert_eq!(store.last_report().unwrap().failed, 17);
}

#[tokio::test]
async fn test_site_content_is_merged_with_defaults() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/hero/hero.md",
        "---\ntitle: Shaping Tomorrow\nbackgroundImage: /images/new.jpg\n---\n",
    )
    .await;
    serve(
        &server,
        "/services/interior-design.md",
        "---\ntitle: Interior Design\ndescription: Rooms\nicon: sofa\n---\n",
    )
    .await;
    serve(
        &server,
        "/services/party-wall.md",
        "---\ntitle: Party Wall\npublished: true\n---\n",
    )
    .await;
    serve(
        &server,
        "/gallery/design-1.md",
        "---\nid: 1\norder: 3\nsrc: /g/c.jpg\n---\n",
    )
    .await;
    serve(
        &server,
        "/gallery/design-2.md",
        "---\nid: 2\norder: 1\nsrc: /g/a.jpg\n---\n",
    )
    .await;
    serve(
        &server,
        "/gallery/design-3.md",
        "---\nid: 3\norder: 2\nsrc: /g/b.jpg\npublished: false\n---\n",
    )
    .await;
    serve(
        &server,
        "/footer/footer.md",
        "---\ncompanyName: Studio Ltd.\nlinks: '[{\"text\": \"Work\", \"url\": \"#work\"}]'\n---\n",
    )
    .await;
    serve(
        &server,
        DEFAULT_SYNC_MARKER_PATH,
        r#"{"lastSync": "2024-05-01T12:30:00.000Z", "message": "Content synced successfully"}"#,
    )
    .await;

    let store = http_store(&server);
    store.refresh().await;
    let snapshot = store.snapshot();

    let hero = snapshot.hero.as_ref().unwrap();
    assert_eq!(hero.title, "Shaping Tomorrow");
    assert_eq!(hero.subtitle, defaults::HERO_SUBTITLE);
    assert_eq!(hero.background_image, "/images/new.jpg");

    assert_eq!(snapshot.services.len(), 2);
    assert_eq!(
        snapshot.services[0].extra.text("icon").as_deref(),
        Some("sofa")
    );

    let srcs: Vec<_> = snapshot
        .gallery
        .iter()
        .map(|g| g.src.as_deref().unwrap())
        .collect();
    assert_eq!(srcs, vec!["/g/a.jpg", "/g/c.jpg"]);

    // Nothing fetched for projects: the built-in list is used.
    assert_eq!(snapshot.projects, defaults::projects());

    let footer = snapshot.footer.as_ref().unwrap();
    assert_eq!(footer.company_name, "Studio Ltd.");
    assert_eq!(footer.links.len(), 1);
    assert_eq!(footer.tagline, defaults::FOOTER_TAGLINE);

    assert_eq!(
        store.sync_marker().unwrap().message,
        "Content synced successfully"
    );
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about/about.md"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(&server, "/about/about.md", "---\ntitle: Who We Are\n---\n").await;

    let store = http_store(&server);
    store.refresh().await;

    assert_eq!(
        store.snapshot().about.as_ref().unwrap().title,
        "Who We Are"
    );
}

#[tokio::test]
async fn test_cms_save_refreshes_through_trigger() {
    let server = MockServer::start().await;
    let store = http_store(&server);
    assert_eq!(
        store.refresh().await,
        RefreshOutcome::Completed { cycles: 1 }
    );

    serve(&server, "/hero/hero.md", "---\ntitle: Just Saved\n---\n").await;
    let trigger = ChangeTrigger::new(
        store.clone(),
        TriggerConfig {
            debounce: Duration::from_secs(30),
            settle_delay: Duration::from_millis(10),
        },
    );

    let outcome = trigger.fire(ChangeSignal::CmsSave).await;
    assert!(matches!(outcome, TriggerOutcome::Refreshed(_)));
    assert_eq!(store.snapshot().hero.as_ref().unwrap().title, "Just Saved");

    let outcome = trigger.fire(ChangeSignal::Focus).await;
    assert!(matches!(outcome, TriggerOutcome::Debounced { .. }));
    assert_eq!(store.cycles_completed(), 2);
}

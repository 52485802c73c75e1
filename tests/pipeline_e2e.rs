//! End-to-end pipeline test: discovery, resolution, and persistence against
//! a single mock catalog.

use std::time::Duration;

use tempfile::TempDir;
use wallgrab_core::{
    AssetResolver, CrawlOutcome, Crawler, DownloadEngine, HttpClient, SearchFilter, resolve_all,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a two-page catalog of two items each, with detail pages and asset
/// bodies, all on the same server.
async fn mount_catalog(server: &MockServer) {
    let uri = server.uri();
    let page = |ids: &[&str]| {
        let mut body = String::from("<html><body>");
        for id in ids {
            body.push_str(&format!(r#"<a class="preview" href="{uri}/w/{id}"></a>"#));
        }
        body.push_str("</body></html>");
        body
    };

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["aaa", "bbb"])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&["ccc", "ddd"])))
        .mount(server)
        .await;

    for id in ["aaa", "bbb", "ccc", "ddd"] {
        let detail = format!(
            r#"<html><body><img id="wallpaper" src="{uri}/full/wallhaven-{id}.png"></body></html>"#
        );
        Mock::given(method("GET"))
            .and(path(format!("/w/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/full/wallhaven-{id}.png")))
            .respond_with(
                ResponseTemplate::new(200).set_body_bytes(format!("image-{id}").into_bytes()),
            )
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_pipeline_limit_three_over_two_pages() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let client = HttpClient::new();
    let mut filter = SearchFilter::new("linux");
    filter.limit = Some(3);

    // Stage 1: both pages are fetched, four links collected, truncated to 3
    let crawl = Crawler::with_base_url(client.clone(), server.uri())
        .with_page_delay(Duration::from_millis(10))
        .crawl(&filter)
        .await
        .unwrap();
    assert_eq!(crawl.outcome, CrawlOutcome::LimitReached);
    assert_eq!(crawl.links.len(), 3);

    // Stage 2: sequential resolution, discovery order preserved
    let resolver = AssetResolver::new(client.clone());
    let locators = resolve_all(&resolver, &crawl.links).await;
    assert_eq!(
        locators,
        vec![
            format!("{}/full/wallhaven-aaa.png", server.uri()),
            format!("{}/full/wallhaven-bbb.png", server.uri()),
            format!("{}/full/wallhaven-ccc.png", server.uri()),
        ]
    );

    // Stage 3: concurrent persistence
    let dir = TempDir::new().unwrap();
    let stats = DownloadEngine::new(2)
        .unwrap()
        .persist(locators, &client, dir.path())
        .await;
    assert_eq!(stats.completed(), 3);
    assert_eq!(stats.failed(), 0);

    for id in ["aaa", "bbb", "ccc"] {
        let saved = dir.path().join(format!("wallhaven-{id}.png"));
        assert_eq!(
            std::fs::read(saved).unwrap(),
            format!("image-{id}").into_bytes()
        );
    }
    assert!(!dir.path().join("wallhaven-ddd.png").exists());
}

#[tokio::test]
async fn test_pipeline_empty_catalog_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new();
    let crawl = Crawler::with_base_url(client, server.uri())
        .with_page_delay(Duration::from_millis(10))
        .crawl(&SearchFilter::new("nothing"))
        .await
        .unwrap();

    assert!(crawl.is_empty());
    assert!(crawl.links.is_empty());
}

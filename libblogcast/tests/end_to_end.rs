//! End-to-end: authorize once, then normalize and publish a draft
//!
//! Every remote endpoint is a wiremock server; the callback is driven by a
//! plain HTTP request standing in for the browser redirect.

use std::time::Duration;

use libblogcast::error::{AuthError, BlogcastError};
use libblogcast::normalizer::mock::MockBackend;
use libblogcast::{AuthorizationFlow, Config, ContentNormalizer, PostPublisher, PostStatus, TokenStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.wordpress.client_id = Some("12345".to_string());
    config.wordpress.client_secret = Some("shh".to_string());
    config.wordpress.site = Some("example.wordpress.com".to_string());
    config.wordpress.api_base = server.uri();
    config.wordpress.token_url = format!("{}/oauth2/token", server.uri());
    config.wordpress.token_file = dir
        .path()
        .join("wp_token.json")
        .to_string_lossy()
        .to_string();
    config
}

#[tokio::test]
async fn test_authorize_then_publish_draft() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("code=granted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "live-token",
            "token_type": "bearer",
            "blog_id": "99",
            "blog_url": "https://example.wordpress.com",
            "scope": "global"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sites/example.wordpress.com/posts/new"))
        .and(header("authorization", "Bearer live-token"))
        .and(body_string_contains("status=draft"))
        .and(body_string_contains("tags=rust%2Casync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 7,
            "URL": "https://example.wordpress.com/?p=7",
            "status": "draft",
            "title": "Async Rust"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Authorize
    let flow = AuthorizationFlow::from_config(&config.wordpress)
        .unwrap()
        .with_callback_port(0)
        .with_callback_timeout(Duration::from_secs(10));
    let store = TokenStore::new(config.token_path());

    let pending = flow.start().await.unwrap();
    let callback = format!("http://{}/callback?code=granted", pending.callback_addr());
    let browser = tokio::spawn(reqwest::get(callback));

    pending.complete(&store).await.unwrap();
    assert_eq!(browser.await.unwrap().unwrap().status(), 200);

    // Publish with the stored token
    let token = store.load().unwrap();
    assert_eq!(token.access_token, "live-token");
    assert_eq!(token.extra["blog_id"], "99");

    let reply = r#"```json
{"title": "Async Rust", "excerpt": "Tasks and runtimes", "content_html": "<h2>Overview</h2><p>x</p>", "tags": ["rust", "async",],}
```"#;
    let normalizer = ContentNormalizer::new(Box::new(MockBackend::replying(reply)), "English");
    let draft = normalizer.normalize("notes about async rust").await.unwrap();

    let publisher = PostPublisher::from_config(&config).unwrap();
    let post = publisher
        .publish(&draft, &token, PostStatus::Draft)
        .await
        .unwrap();

    assert_eq!(post.id, 7);
    assert_eq!(post.url, "https://example.wordpress.com/?p=7");
    assert_eq!(post.status, "draft");
}

#[tokio::test]
async fn test_callback_timeout_leaves_no_token() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir);

    let flow = AuthorizationFlow::from_config(&config.wordpress)
        .unwrap()
        .with_callback_port(0)
        .with_callback_timeout(Duration::from_millis(200));
    let store = TokenStore::new(config.token_path());

    let err = flow.run(&store, |_| {}).await.unwrap_err();

    assert!(matches!(err, BlogcastError::Auth(AuthError::Timeout(_))));
    assert!(!store.exists());

    let load = store.load().unwrap_err();
    assert!(load.to_string().contains("Run blog-auth first"));
}

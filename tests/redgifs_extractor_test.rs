// tests/redgifs_extractor_test.rs

use async_trait::async_trait;
use mockito::{Matcher, Server};
use redgifs_dl::{
    build_extractor,
    config::{
        AppConfig,
        token::{StaticTokenProvider, TokenProvider},
    },
    error::{AppError, ResolveError, SchemaError},
    extractor::{ResourceExtractor, redgifs::RedgifsExtractor},
    models::ResolvedLinks,
};
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

const TOKEN: &str = "test-token";
const POST_URL: &str = "https://www.redgifs.com/watch/ABC123";

// 辅助函数: 让解析器的 API 模板指向模拟服务器
fn extractor_with_provider(server_url: &str, provider: Arc<dyn TokenProvider>) -> RedgifsExtractor {
    let mut config = AppConfig::default();
    config.api.gif_template = format!("{}/v2/gifs/{{id}}", server_url);
    config.api.gallery_template = format!("{}/v2/gallery/{{gallery_id}}", server_url);
    build_extractor(Arc::new(config), provider).expect("构建解析器失败")
}

fn extractor_for(server_url: &str) -> RedgifsExtractor {
    extractor_with_provider(
        server_url,
        Arc::new(StaticTokenProvider::new(Some(TOKEN.to_string()))),
    )
}

fn links(items: &[&str]) -> ResolvedLinks {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_video_uses_hd_when_available() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let hd = format!("{}/media/abc123.mp4", url);
    let sd = format!("{}/media/abc123-mobile.mp4", url);

    let item_mock = server
        .mock("GET", "/v2/gifs/abc123")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .match_header("referer", "https://www.redgifs.com/")
        .match_header("origin", "https://www.redgifs.com")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "gif": { "type": 1, "urls": { "hd": hd, "sd": sd }, "gallery": null } }).to_string())
        .create_async()
        .await;
    let head_mock = server
        .mock("HEAD", "/media/abc123.mp4")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .create_async()
        .await;

    let resolved = extractor_for(&url).resolve_links(POST_URL).await.unwrap();

    item_mock.assert_async().await;
    head_mock.assert_async().await;
    assert_eq!(resolved, links(&[&hd]));
}

#[tokio::test]
async fn test_video_falls_back_to_sd_when_hd_unavailable() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let hd = format!("{}/media/abc123.mp4", url);
    let sd = format!("{}/media/abc123-mobile.mp4", url);

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 1, "urls": { "hd": hd, "sd": sd } } }).to_string())
        .create_async()
        .await;
    let head_mock = server
        .mock("HEAD", "/media/abc123.mp4")
        .with_status(404)
        .create_async()
        .await;

    let resolved = extractor_for(&url).resolve_links(POST_URL).await.unwrap();

    head_mock.assert_async().await;
    assert_eq!(resolved, links(&[&sd]));
}

#[tokio::test]
async fn test_video_without_sd_fails_when_hd_unavailable() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let hd = format!("{}/media/abc123.mp4", url);

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 1, "urls": { "hd": hd } } }).to_string())
        .create_async()
        .await;
    server
        .mock("HEAD", "/media/abc123.mp4")
        .with_status(500)
        .create_async()
        .await;

    let result = extractor_for(&url).resolve_links(POST_URL).await;
    assert!(matches!(
        result,
        Err(ResolveError::Schema(SchemaError::MissingField("gif.urls.sd")))
    ));
}

#[tokio::test]
async fn test_single_image_and_cdn_normalization() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(
            json!({ "gif": { "type": 2, "urls": { "hd": "https://thumbs2.redgifs.com/Abc123.jpg" }, "gallery": "" } })
                .to_string(),
        )
        .create_async()
        .await;

    let resolved = extractor_for(&url)
        .resolve_links("https://www.redgifs.com/watch/abc123-mobile?ref=share")
        .await
        .unwrap();

    // 图片不检查可用性，并且 thumbs2 会被连续改写为 thumbs4
    assert_eq!(resolved, links(&["https://thumbs4.redgifs.com/Abc123.jpg"]));
}

#[tokio::test]
async fn test_gallery_expands_to_every_member_without_auth() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let item_mock = server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 2, "urls": { "hd": "https://thumbs4.redgifs.com/cover.jpg" }, "gallery": "gal42" } }).to_string())
        .create_async()
        .await;
    let gallery_mock = server
        .mock("GET", "/v2/gallery/gal42")
        .match_header("authorization", Matcher::Missing)
        .match_header("referer", "https://www.redgifs.com/")
        .with_status(200)
        .with_body(
            json!({ "gifs": [
                { "id": "one", "urls": { "hd": "https://thumbs4.redgifs.com/One.jpg", "sd": "x" } },
                { "id": "two", "urls": { "hd": "https://thumbs3.redgifs.com/Two.jpg" } },
                { "id": "three", "urls": { "hd": "https://thumbs4.redgifs.com/Three.jpg" } }
            ] })
            .to_string(),
        )
        .create_async()
        .await;

    let extractor = extractor_for(&url);
    let resources = extractor.find_resources(POST_URL).await.unwrap();

    item_mock.assert_async().await;
    gallery_mock.assert_async().await;
    assert_eq!(resources.len(), 3);
    let urls: ResolvedLinks = resources.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        urls,
        links(&[
            "https://thumbs4.redgifs.com/One.jpg",
            "https://thumbs4.redgifs.com/Two.jpg",
            "https://thumbs4.redgifs.com/Three.jpg",
        ])
    );
    assert!(resources.iter().all(|r| r.source_url == POST_URL));
    assert!(resources.iter().all(|r| r.extension.as_deref() == Some("jpg")));
}

// 单条记录指向相册 "gal42"，供相册失败场景复用
async fn mock_gallery_item(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 2, "urls": { "hd": "https://thumbs4.redgifs.com/cover.jpg" }, "gallery": "gal42" } }).to_string())
        .create_async()
        .await
}

async fn mock_gallery_body(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/v2/gallery/gal42")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_gallery_with_invalid_json_is_malformed_response() {
    let mut server = Server::new_async().await;
    let url = server.url();
    mock_gallery_item(&mut server).await;
    let gallery_mock = mock_gallery_body(&mut server, "nope").await;

    let extractor = extractor_for(&url);
    let result = extractor.resolve_links(POST_URL).await;

    gallery_mock.assert_async().await;
    assert!(
        matches!(result, Err(ResolveError::MalformedResponse { ref url, .. }) if url.ends_with("/v2/gallery/gal42")),
        "实际: {result:?}"
    );
    assert!(extractor.find_resources(POST_URL).await.is_err());
}

#[tokio::test]
async fn test_gallery_without_gifs_is_schema_mismatch() {
    let mut server = Server::new_async().await;
    let url = server.url();
    mock_gallery_item(&mut server).await;
    mock_gallery_body(&mut server, &json!({ "items": [] }).to_string()).await;

    let extractor = extractor_for(&url);
    let result = extractor.resolve_links(POST_URL).await;

    assert!(
        matches!(result, Err(ResolveError::Schema(SchemaError::Mismatch(_)))),
        "实际: {result:?}"
    );
    assert!(extractor.find_resources(POST_URL).await.is_err());
}

#[tokio::test]
async fn test_gallery_member_without_hd_fails_whole_gallery() {
    let mut server = Server::new_async().await;
    let url = server.url();
    mock_gallery_item(&mut server).await;
    let body = json!({ "gifs": [
        { "id": "one", "urls": { "hd": "https://thumbs4.redgifs.com/One.jpg" } },
        { "id": "two", "urls": { "sd": "https://thumbs4.redgifs.com/Two-mobile.jpg" } }
    ] });
    mock_gallery_body(&mut server, &body.to_string()).await;

    let extractor = extractor_for(&url);
    let result = extractor.resolve_links(POST_URL).await;

    // 不返回部分成员
    assert!(
        matches!(result, Err(ResolveError::Schema(SchemaError::Mismatch(_)))),
        "实际: {result:?}"
    );
    assert!(extractor.find_resources(POST_URL).await.is_err());
}

#[tokio::test]
async fn test_gallery_transport_failure() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let item_mock = mock_gallery_item(&mut server).await;

    let mut config = AppConfig::default();
    config.api.gif_template = format!("{}/v2/gifs/{{id}}", url);
    // 没有任何服务监听的端口
    config.api.gallery_template = "http://127.0.0.1:9/v2/gallery/{gallery_id}".to_string();
    let extractor = build_extractor(
        Arc::new(config),
        Arc::new(StaticTokenProvider::new(Some(TOKEN.to_string()))),
    )
    .expect("构建解析器失败");

    let result = extractor.resolve_links(POST_URL).await;

    item_mock.assert_async().await;
    assert!(
        matches!(result, Err(ResolveError::Transport { ref url, .. }) if url.contains("127.0.0.1:9")),
        "实际: {result:?}"
    );
    assert!(extractor.find_resources(POST_URL).await.is_err());
}

#[tokio::test]
async fn test_gallery_forbidden_is_http_status_not_token_error() {
    let mut server = Server::new_async().await;
    let url = server.url();
    mock_gallery_item(&mut server).await;
    server
        .mock("GET", "/v2/gallery/gal42")
        .with_status(403)
        .create_async()
        .await;

    let err = extractor_for(&url)
        .resolve_links(POST_URL)
        .await
        .expect_err("相册 403 应当失败");

    assert!(
        matches!(err, ResolveError::HttpStatus { status, .. } if status.as_u16() == 403),
        "实际: {err:?}"
    );
    assert!(!err.to_string().contains("认证失败"));
}

#[tokio::test]
async fn test_unknown_media_type_is_rejected() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 3, "urls": { "hd": "https://thumbs4.redgifs.com/a.mp4" } } }).to_string())
        .create_async()
        .await;

    let result = extractor_for(&url).resolve_links(POST_URL).await;
    assert!(matches!(
        result,
        Err(ResolveError::Schema(SchemaError::UnsupportedMediaType(3)))
    ));
}

#[tokio::test]
async fn test_missing_fields_are_schema_errors() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body(json!({ "error": { "code": "NotFound" } }).to_string())
        .create_async()
        .await;

    let result = extractor_for(&url).resolve_links(POST_URL).await;
    assert!(matches!(
        result,
        Err(ResolveError::Schema(SchemaError::Mismatch(_)))
    ));
}

#[tokio::test]
async fn test_malformed_json_reports_parse_detail() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/v2/gifs/abc123")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = extractor_for(&url)
        .resolve_links(POST_URL)
        .await
        .expect_err("非 JSON 响应应当失败");
    let message = err.to_string();
    match err {
        ResolveError::MalformedResponse { source, .. } => {
            assert!(message.contains(&source.to_string()), "错误信息应包含解析细节: {message}");
        }
        other => panic!("期望 MalformedResponse，实际: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_errors_are_reported() {
    let mut server = Server::new_async().await;
    let url = server.url();

    server
        .mock("GET", "/v2/gifs/gone")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/v2/gifs/locked")
        .with_status(401)
        .create_async()
        .await;

    let extractor = extractor_for(&url);
    assert!(matches!(
        extractor.resolve_links("https://www.redgifs.com/watch/gone").await,
        Err(ResolveError::HttpStatus { status, .. }) if status.as_u16() == 404
    ));
    assert!(matches!(
        extractor.resolve_links("https://www.redgifs.com/watch/locked").await,
        Err(ResolveError::TokenInvalid)
    ));
}

#[tokio::test]
async fn test_transport_failure_without_response() {
    // 没有任何服务监听的端口
    let extractor = extractor_for("http://127.0.0.1:9");
    assert!(matches!(
        extractor.resolve_links(POST_URL).await,
        Err(ResolveError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_malformed_url_never_hits_the_network() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let any_request = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let extractor = extractor_for(&url);
    let err = extractor
        .find_resources("https://www.redgifs.com/")
        .await
        .expect_err("根路径应当失败");

    any_request.assert_async().await;
    assert!(matches!(err, AppError::Resolve(ResolveError::MalformedUrl { .. })));
    assert!(err.to_string().starts_with("解析失败"));
}

#[tokio::test]
async fn test_missing_token_fails_before_request() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let any_request = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let extractor = extractor_with_provider(&url, Arc::new(StaticTokenProvider::new(None)));
    let result = extractor.resolve_links(POST_URL).await;

    any_request.assert_async().await;
    assert!(matches!(result, Err(ResolveError::TokenMissing)));
}

struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl TokenProvider for CountingProvider {
    async fn get_token(&self) -> Result<String, ResolveError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("rotated-{}", n))
    }
}

#[tokio::test]
async fn test_token_is_requested_from_injected_provider() {
    let mut server = Server::new_async().await;
    let url = server.url();

    let item_mock = server
        .mock("GET", "/v2/gifs/abc123")
        .match_header("authorization", "Bearer rotated-0")
        .with_status(200)
        .with_body(json!({ "gif": { "type": 2, "urls": { "hd": "https://thumbs4.redgifs.com/a.jpg" } } }).to_string())
        .create_async()
        .await;

    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let extractor = extractor_with_provider(&url, provider.clone());
    extractor.resolve_links(POST_URL).await.unwrap();

    item_mock.assert_async().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

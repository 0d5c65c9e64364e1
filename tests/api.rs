// Router-level tests: the production routing driven in-process with
// in-memory collection sources, no network and no live upstream.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use gallery_backend::controllers::favorites::FavoritesController;
use gallery_backend::controllers::image::ImageController;
use gallery_backend::domain::favorites::{
    FavoriteItem, FavoritesPage, FavoritesService, FavoritesSource, ItemId, Source,
};
use gallery_backend::error::{AppResult, ErrorResponse};
use gallery_backend::infrastructure::config::RelayConfig;
use gallery_backend::infrastructure::http::build_router;

struct StaticSource(Vec<FavoriteItem>);

#[async_trait]
impl FavoritesSource for StaticSource {
    async fn fetch_all(&self) -> AppResult<Vec<FavoriteItem>> {
        Ok(self.0.clone())
    }
}

fn item(id: i64, tags: &[&str], ai_type: Option<i64>) -> FavoriteItem {
    FavoriteItem {
        id: ItemId::Number(id),
        source: Source::Pixiv,
        title: format!("work {}", id),
        user: None,
        image_url: Some(format!("https://i.pximg.net/img/{}.jpg", id)),
        artwork_url: format!("https://www.pixiv.net/artworks/{}", id),
        user_url: None,
        page_count: Some(1),
        pages: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ai_type,
    }
}

fn app_with(items: Vec<FavoriteItem>) -> axum::Router {
    let service = Arc::new(FavoritesService::new(
        Some(Arc::new(StaticSource(items))),
        None,
        false,
    ));
    let favorites = Arc::new(FavoritesController::new(service));
    let image = Arc::new(ImageController::new(RelayConfig::default()));
    build_router(favorites, image)
}

fn app_without_sources() -> axum::Router {
    let service = Arc::new(FavoritesService::new(None, None, false));
    let favorites = Arc::new(FavoritesController::new(service));
    let image = Arc::new(ImageController::new(RelayConfig::default()));
    build_router(favorites, image)
}

async fn get_json<T: serde::de::DeserializeOwned>(
    app: &axum::Router,
    uri: &str,
) -> (StatusCode, T) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("bad body for {}: {} ({:?})", uri, e, body));
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app_with(vec![]);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let app = app_with(vec![]);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_small_collection_fits_one_page() {
    let app = app_with((0..3).map(|i| item(i, &[], None)).collect());
    let (status, page): (_, FavoritesPage) =
        get_json(&app, "/favorites?limit=10&offset=0&tags=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.total, 3);
    assert!(!page.has_more);
    assert_eq!(page.offset, 3);
    assert!(!page.seed.is_empty());
}

#[tokio::test]
async fn test_seed_is_echoed_and_fixes_the_order() {
    let app = app_with((0..40).map(|i| item(i, &[], None)).collect());
    let (_, first): (_, FavoritesPage) = get_json(&app, "/favorites?seed=abc123").await;
    let (_, again): (_, FavoritesPage) = get_json(&app, "/favorites?seed=abc123").await;
    assert_eq!(first.seed, "abc123");
    assert_eq!(first.data, again.data);
}

#[tokio::test]
async fn test_paging_walks_the_whole_shuffle_without_repeats() {
    let app = app_with((0..47).map(|i| item(i, &[], None)).collect());

    let mut seen: Vec<ItemId> = Vec::new();
    let mut offset = 0usize;
    loop {
        let uri = format!("/favorites?limit=10&offset={}&seed=walk", offset);
        let (status, page): (_, FavoritesPage) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        for entry in &page.data {
            assert!(!seen.contains(&entry.id), "duplicate item across pages");
            seen.push(entry.id.clone());
        }
        offset = page.offset;
        if !page.has_more {
            break;
        }
    }
    assert_eq!(seen.len(), 47);
}

#[tokio::test]
async fn test_limit_is_clamped_to_served_bounds() {
    let app = app_with((0..60).map(|i| item(i, &[], None)).collect());

    let (_, big): (_, FavoritesPage) = get_json(&app, "/favorites?limit=500").await;
    assert_eq!(big.data.len(), 30);

    let (_, small): (_, FavoritesPage) = get_json(&app, "/favorites?limit=1").await;
    assert_eq!(small.data.len(), 10);

    let (_, junk): (_, FavoritesPage) = get_json(&app, "/favorites?limit=wat").await;
    assert_eq!(junk.data.len(), 10);
}

#[tokio::test]
async fn test_tag_filtering_with_modes() {
    let app = app_with(vec![
        item(1, &["Sky", "Landscape"], None),
        item(2, &["Sky"], None),
        item(3, &["Portrait"], None),
    ]);

    let (_, or_page): (_, FavoritesPage) =
        get_json(&app, "/favorites?tags=sky,portrait").await;
    assert_eq!(or_page.total, 3);

    let (_, and_page): (_, FavoritesPage) =
        get_json(&app, "/favorites?tags=sky,landscape&mode=and").await;
    assert_eq!(and_page.total, 1);
    assert_eq!(and_page.data[0].id, ItemId::Number(1));
}

#[tokio::test]
async fn test_ai_category_filter() {
    let app = app_with(vec![
        item(1, &[], Some(2)),
        item(2, &[], Some(0)),
        item(3, &[], None),
    ]);

    let (_, ai): (_, FavoritesPage) = get_json(&app, "/favorites?ai=ai").await;
    assert_eq!(ai.total, 1);

    let (_, non_ai): (_, FavoritesPage) = get_json(&app, "/favorites?ai=non-ai").await;
    assert_eq!(non_ai.total, 2);

    let (_, all): (_, FavoritesPage) = get_json(&app, "/favorites?ai=all").await;
    assert_eq!(all.total, 3);
}

#[tokio::test]
async fn test_empty_collection_returns_empty_page() {
    let app = app_with(vec![]);
    let (status, page): (_, FavoritesPage) = get_json(&app, "/favorites?offset=30").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.data.is_empty());
    assert_eq!(page.offset, 0);
    assert_eq!(page.total, 0);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_missing_credential_is_a_bad_request() {
    let app = app_without_sources();

    let (status, error): (_, ErrorResponse) = get_json(&app, "/favorites").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "PIXIV_REFRESH_TOKEN is required");

    let (status, error): (_, ErrorResponse) =
        get_json(&app, "/favorites?source=raindrop").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "RAINDROP_TOKEN is required");
}

#[tokio::test]
async fn test_image_relay_rejects_off_list_hosts() {
    let app = app_with(vec![]);
    let (status, error): (_, ErrorResponse) =
        get_json(&app, "/image?url=https://evil.example/x.png").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "unsupported image host");
}

#[tokio::test]
async fn test_image_relay_validates_the_url_param() {
    let app = app_with(vec![]);

    let (status, error): (_, ErrorResponse) = get_json(&app, "/image").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "url query is required");

    let (status, error): (_, ErrorResponse) = get_json(&app, "/image?url=not-a-url").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.error, "invalid url");
}

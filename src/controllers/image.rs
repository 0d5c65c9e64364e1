use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use futures::TryStreamExt;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::infrastructure::config::RelayConfig;

#[derive(Debug, Deserialize)]
pub struct ImageParams {
    pub url: Option<String>,
}

/// Pass-through relay for the hotlink-restricted image CDN. The body is
/// streamed straight through; large originals never sit in memory whole.
pub struct ImageController {
    relay: RelayConfig,
    http_client: reqwest::Client,
}

impl ImageController {
    pub fn new(relay: RelayConfig) -> Self {
        Self {
            relay,
            http_client: reqwest::Client::new(),
        }
    }

    fn host_allowed(&self, host: &str) -> bool {
        let suffix = self.relay.allowed_host_suffix.as_str();
        host == suffix || host.ends_with(&format!(".{}", suffix))
    }

    /// GET /image?url= - relay one image from the allow-listed CDN
    pub async fn relay_image(
        State(controller): State<Arc<ImageController>>,
        Query(params): Query<ImageParams>,
    ) -> AppResult<Response> {
        let target = params
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::BadRequest("url query is required".to_string()))?;

        let url = reqwest::Url::parse(&target)
            .map_err(|_| AppError::BadRequest("invalid url".to_string()))?;

        let host = url.host_str().unwrap_or_default();
        if !controller.host_allowed(host) {
            return Err(AppError::BadRequest("unsupported image host".to_string()));
        }

        let upstream = controller
            .http_client
            .get(url)
            .header("Referer", &controller.relay.referer)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("image relay: {}", e)))?;

        // reqwest and axum sit on different http major versions, so the
        // status and content type cross over by value.
        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = upstream
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| HeaderValue::from_str(value).ok());

        let mut builder = Response::builder()
            .status(status)
            .header(header::CACHE_CONTROL, "public, max-age=86400");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        let body = Body::from_stream(upstream.bytes_stream().map_err(std::io::Error::other));
        builder
            .body(body)
            .map_err(|e| AppError::Internal(format!("relay response: {}", e)))
    }
}

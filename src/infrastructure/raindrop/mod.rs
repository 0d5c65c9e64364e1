use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::favorites::{FavoriteItem, FavoritesSource, ItemId, Source};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::RaindropConfig;

const PER_PAGE: usize = 50;

#[derive(Debug, Deserialize)]
struct RaindropListing {
    #[serde(default)]
    items: Vec<RaindropItem>,
    #[serde(default)]
    count: usize,
}

/// The `cover` field is either a single URL or an array of candidates.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Cover {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RaindropItem {
    #[serde(rename = "_id")]
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    cover: Option<Cover>,
    #[serde(default)]
    media: Vec<RaindropMedia>,
}

#[derive(Debug, Deserialize)]
struct RaindropMedia {
    #[serde(default)]
    link: Option<String>,
}

impl RaindropItem {
    /// Image URL priority: single cover string, first cover array entry,
    /// first media entry with a non-empty link. Pure per-item derivation.
    fn image_url(&self) -> Option<String> {
        match &self.cover {
            Some(Cover::One(url)) if !url.is_empty() => return Some(url.clone()),
            Some(Cover::Many(urls)) => {
                if let Some(first) = urls.first() {
                    return Some(first.clone());
                }
            }
            _ => {}
        }
        self.media
            .iter()
            .find_map(|entry| entry.link.as_deref().filter(|link| !link.is_empty()))
            .map(|link| link.to_string())
    }

    fn into_favorite(self) -> FavoriteItem {
        let image_url = self.image_url();
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| self.excerpt.as_deref().map(str::trim).filter(|t| !t.is_empty()))
            .unwrap_or("Untitled")
            .to_string();

        FavoriteItem {
            id: ItemId::Number(self.id),
            source: Source::Raindrop,
            title,
            user: None,
            image_url,
            artwork_url: self.link.unwrap_or_default(),
            user_url: None,
            page_count: None,
            pages: None,
            tags: self.tags,
            ai_type: None,
        }
    }
}

pub struct RaindropClient {
    config: RaindropConfig,
    http_client: reqwest::Client,
}

impl RaindropClient {
    pub fn new(config: RaindropConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn fetch_page(&self, page: usize) -> AppResult<RaindropListing> {
        let url = format!(
            "{}/raindrops/0?perpage={}&page={}",
            self.config.api_base_url, PER_PAGE, page
        );
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("raindrop listing: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = %status.as_u16(), body = %body, "raindrop listing rejected");
            return Err(AppError::UpstreamFetch(format!(
                "raindrop api error: {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("raindrop decode: {}", e)))
    }
}

#[async_trait]
impl FavoritesSource for RaindropClient {
    /// Walk the page-numbered listing until the reported count is
    /// reached, a page comes back empty, or a page comes back short.
    async fn fetch_all(&self) -> AppResult<Vec<FavoriteItem>> {
        let mut results = Vec::new();
        let mut page = 0usize;

        loop {
            let listing = self.fetch_page(page).await?;
            let fetched = listing.items.len();
            if fetched == 0 {
                break;
            }
            results.extend(listing.items.into_iter().map(|item| item.into_favorite()));
            if fetched < PER_PAGE || results.len() >= listing.count {
                break;
            }
            page += 1;
        }

        tracing::debug!(pages = page + 1, total = results.len(), "raindrop collection drained");
        Ok(results)
    }
}

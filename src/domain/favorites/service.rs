use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::error::FavoritesServiceError;
use super::filter::{filter_by_ai, filter_by_tags};
use super::model::{FavoriteItem, Source};
use super::pagination::{mint_seed, paginate};
use super::{FavoritesPage, FavoritesQuery};
use crate::error::AppResult;

/// TTL for the optional collection cache, matching the edge cache the
/// service historically sat behind.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// One upstream collection, drained whole. Implementations live in
/// `infrastructure`; the service and the tests only see this seam.
#[async_trait]
pub trait FavoritesSource: Send + Sync {
    /// Drain the entire upstream listing into one normalized sequence,
    /// in upstream order. Any page failure aborts the whole fetch.
    async fn fetch_all(&self) -> AppResult<Vec<FavoriteItem>>;
}

pub struct FavoritesService {
    pixiv: Option<Arc<dyn FavoritesSource>>,
    raindrop: Option<Arc<dyn FavoritesSource>>,
    cache: Option<Cache<Source, Arc<Vec<FavoriteItem>>>>,
}

impl FavoritesService {
    pub fn new(
        pixiv: Option<Arc<dyn FavoritesSource>>,
        raindrop: Option<Arc<dyn FavoritesSource>>,
        cache_enabled: bool,
    ) -> Self {
        let cache = cache_enabled.then(|| {
            Cache::builder()
                .max_capacity(4)
                .time_to_live(CACHE_TTL)
                .build()
        });
        Self {
            pixiv,
            raindrop,
            cache,
        }
    }
}

#[async_trait]
pub trait FavoritesServiceApi: Send + Sync {
    async fn browse(&self, query: FavoritesQuery) -> Result<FavoritesPage, FavoritesServiceError>;
}

#[async_trait]
impl FavoritesServiceApi for FavoritesService {
    async fn browse(&self, query: FavoritesQuery) -> Result<FavoritesPage, FavoritesServiceError> {
        let seed = query.seed.clone().unwrap_or_else(mint_seed);

        let items = self.fetch_collection(query.source).await?;
        tracing::debug!(
            source = %query.source,
            total = items.len(),
            seed = %seed,
            "collection drained"
        );

        if items.is_empty() {
            return Ok(FavoritesPage {
                data: Vec::new(),
                offset: 0,
                has_more: false,
                total: 0,
                seed,
            });
        }

        let filtered = filter_by_tags(items.as_ref().clone(), &query.tags, query.mode);
        // The AI classification only exists on pixiv items.
        let filtered = match query.source {
            Source::Pixiv => filter_by_ai(filtered, query.ai),
            Source::Raindrop => filtered,
        };

        let window = paginate(&filtered, &seed, query.offset, query.limit);
        Ok(FavoritesPage {
            data: window.data,
            offset: window.offset,
            has_more: window.has_more,
            total: window.total,
            seed,
        })
    }
}

impl FavoritesService {
    fn source_client(
        &self,
        source: Source,
    ) -> Result<&Arc<dyn FavoritesSource>, FavoritesServiceError> {
        let (client, credential) = match source {
            Source::Pixiv => (&self.pixiv, "PIXIV_REFRESH_TOKEN"),
            Source::Raindrop => (&self.raindrop, "RAINDROP_TOKEN"),
        };
        client
            .as_ref()
            .ok_or_else(|| FavoritesServiceError::MissingCredential(credential.to_string()))
    }

    async fn fetch_collection(
        &self,
        source: Source,
    ) -> Result<Arc<Vec<FavoriteItem>>, FavoritesServiceError> {
        let client = self.source_client(source)?;

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&source).await {
                tracing::debug!(source = %source, total = hit.len(), "collection cache hit");
                return Ok(hit);
            }
        }

        let items = Arc::new(client.fetch_all().await?);

        // Only successful full drains are cached; a failed fetch must
        // surface on every request rather than pin an empty collection.
        if let Some(cache) = &self.cache {
            cache.insert(source, items.clone()).await;
        }

        Ok(items)
    }
}

pub mod error;
pub mod filter;
pub mod model;
pub mod pagination;
pub mod rng;
pub mod service;

pub use error::FavoritesServiceError;
pub use model::{FavoriteItem, ItemId, ItemUser, Source};
pub use service::{FavoritesService, FavoritesServiceApi, FavoritesSource};

use serde::{Deserialize, Serialize};

use self::filter::{AiFilter, TagMode};

/// Raw query string of GET /favorites. Numeric fields stay strings here
/// because out-of-range and unparseable values have defined fallbacks.
#[derive(Debug, Default, Deserialize)]
pub struct FavoritesParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub seed: Option<String>,
    pub tags: Option<String>,
    pub mode: Option<String>,
    pub ai: Option<String>,
    pub source: Option<String>,
}

/// Fully parsed browse request.
#[derive(Debug, Clone)]
pub struct FavoritesQuery {
    pub source: Source,
    pub limit: usize,
    pub offset: usize,
    pub seed: Option<String>,
    pub tags: Vec<String>,
    pub mode: TagMode,
    pub ai: AiFilter,
}

impl From<FavoritesParams> for FavoritesQuery {
    fn from(params: FavoritesParams) -> Self {
        let source = match params.source.as_deref() {
            Some("raindrop") => Source::Raindrop,
            _ => Source::Pixiv,
        };
        Self {
            source,
            limit: pagination::clamp_limit(params.limit.as_deref()),
            offset: pagination::parse_offset(params.offset.as_deref()),
            seed: params.seed.filter(|s| !s.is_empty()),
            tags: filter::parse_tag_query(params.tags.as_deref().unwrap_or("")),
            mode: TagMode::parse(params.mode.as_deref()),
            ai: AiFilter::parse(params.ai.as_deref()),
        }
    }
}

/// Response for GET /favorites. `offset` is the cursor for the next page;
/// `seed` must be echoed back to keep the same shuffle.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPage {
    pub data: Vec<FavoriteItem>,
    pub offset: usize,
    pub has_more: bool,
    pub total: usize,
    pub seed: String,
}

use axum::{extract::Query, extract::State, Json};
use std::sync::Arc;

use crate::domain::favorites::{
    FavoritesPage, FavoritesParams, FavoritesQuery, FavoritesService, FavoritesServiceApi,
};
use crate::error::AppResult;

pub struct FavoritesController {
    favorites_service: Arc<FavoritesService>,
}

impl FavoritesController {
    pub fn new(favorites_service: Arc<FavoritesService>) -> Self {
        Self { favorites_service }
    }

    /// GET /favorites - one shuffled window of the filtered collection
    pub async fn get_favorites(
        State(controller): State<Arc<FavoritesController>>,
        Query(params): Query<FavoritesParams>,
    ) -> AppResult<Json<FavoritesPage>> {
        let query = FavoritesQuery::from(params);
        tracing::debug!(
            source = %query.source,
            limit = query.limit,
            offset = query.offset,
            tags = query.tags.len(),
            "favorites requested"
        );
        let page = controller.favorites_service.browse(query).await?;
        Ok(Json(page))
    }
}

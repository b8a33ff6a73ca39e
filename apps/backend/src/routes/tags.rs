//! Tag endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::RequestUser;
use crate::AppState;

/// GET /api/v1/tags
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<RequestUser>,
) -> Result<Json<TagListResponse>> {
    let tags = state.db.list_tags(&user.user_id).await?;
    let items = tags
        .into_iter()
        .map(|tag| TagItem {
            id: tag.id,
            name: tag.name,
        })
        .collect();

    Ok(Json(TagListResponse { items }))
}

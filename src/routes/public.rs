use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult, models::PublicMenu, response::ApiResponse, services::public_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/menus/{id}", get(get_public_menu))
}

#[utoipa::path(
    get,
    path = "/api/public/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu with items and social handles", body = ApiResponse<PublicMenu>),
        (status = 404, description = "Menu not found")
    ),
    security(()),
    tag = "Public"
)]
pub async fn get_public_menu(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PublicMenu>>> {
    let resp = public_service::get_public_menu(&state, id).await?;
    Ok(Json(resp))
}

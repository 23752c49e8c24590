use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        menus::{CreateMenuRequest, MenuList, QuotaUsage, UpdateMenuRequest},
        products::{AddImageRequest, CreateProductRequest, ProductList, ReorderProductsRequest},
        social::UpsertSocialMediaRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Menu, Product, SocialMedia},
    response::ApiResponse,
    routes::params::Pagination,
    services::{menu_service, product_service, social_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menus).post(create_menu))
        .route("/quota", get(quota))
        .route("/{id}", get(get_menu).put(update_menu).delete(delete_menu))
        .route("/{id}/products", get(list_products).post(add_product))
        .route("/{id}/products/order", put(reorder_products))
        .route("/{id}/images", post(add_image))
        .route(
            "/{id}/social-media",
            get(get_social_media).put(upsert_social_media),
        )
}

#[utoipa::path(
    get,
    path = "/api/menus",
    params(Pagination),
    responses(
        (status = 200, description = "Caller's menus, newest first", body = ApiResponse<MenuList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn list_menus(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<MenuList>>> {
    let resp = menu_service::list_user_menus(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menus",
    request_body = CreateMenuRequest,
    responses(
        (status = 200, description = "Menu created", body = ApiResponse<Menu>),
        (status = 400, description = "Invalid item"),
        (status = 403, description = "Menu quota reached")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::create_menu(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menus/quota",
    responses(
        (status = 200, description = "Menu quota usage", body = ApiResponse<QuotaUsage>)
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn quota(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<QuotaUsage>>> {
    let resp = menu_service::quota_usage(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu", body = ApiResponse<Menu>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Menu not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::get_menu(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpdateMenuRequest,
    responses(
        (status = 200, description = "Updated menu", body = ApiResponse<Menu>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Menu not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn update_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuRequest>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::update_menu(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menus/{id}",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu, items and social row deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Menu not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Menus"
)]
pub async fn delete_menu(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = menu_service::delete_menu(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}/products",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Menu items in display order", body = ApiResponse<ProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_menu_products(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menus/{id}/products",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product appended to the menu", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::add_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menus/{id}/images",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = AddImageRequest,
    responses(
        (status = 200, description = "Image item appended to the menu", body = ApiResponse<Product>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddImageRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::add_image(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menus/{id}/products/order",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = ReorderProductsRequest,
    responses(
        (status = 200, description = "Items in their new order", body = ApiResponse<ProductList>),
        (status = 400, description = "Ids do not match the menu's items")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn reorder_products(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderProductsRequest>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::reorder_products(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/menus/{id}/social-media",
    params(("id" = Uuid, Path, description = "Menu ID")),
    responses(
        (status = 200, description = "Social handles, or null", body = ApiResponse<SocialMedia>)
    ),
    security(("bearer_auth" = [])),
    tag = "Social media"
)]
pub async fn get_social_media(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Option<SocialMedia>>>> {
    let resp = social_service::get_menu_social_media(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menus/{id}/social-media",
    params(("id" = Uuid, Path, description = "Menu ID")),
    request_body = UpsertSocialMediaRequest,
    responses(
        (status = 200, description = "Saved social handles", body = ApiResponse<SocialMedia>)
    ),
    security(("bearer_auth" = [])),
    tag = "Social media"
)]
pub async fn upsert_social_media(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertSocialMediaRequest>,
) -> AppResult<Json<ApiResponse<SocialMedia>>> {
    let resp = social_service::upsert_social_media(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

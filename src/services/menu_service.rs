use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::{self, NotSet};
use uuid::Uuid;

use crate::{
    audit,
    dto::menus::{CreateMenuRequest, MenuList, QuotaUsage, UpdateMenuRequest},
    entity::{
        menus::{ActiveModel as MenuActive, Column as MenuCol, Entity as Menus, Model as MenuModel},
        products::{Column as ProductCol, Entity as Products},
        social_media::{Column as SocialCol, Entity as SocialMedia},
        users::{Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, require_admin},
    models::{Menu, blank_to_none},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{product_service, social_service, upload_service},
    state::AppState,
};

pub const DEFAULT_MENU_NAME: &str = "New menu";
pub const DEFAULT_BANNER_COLOR: &str = "#E5324B";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#333333";
pub const DEFAULT_FONT_FAMILY: &str = "Poppins";
pub const DEFAULT_BODY_BACKGROUND_COLOR: &str = "#f5f5f5";

fn or_default(value: Option<String>, default: &str) -> String {
    blank_to_none(value).unwrap_or_else(|| default.to_string())
}

/// `Some("")` clears the column, `None` leaves it alone.
fn set_nullable(target: &mut ActiveValue<Option<String>>, value: Option<String>) {
    if let Some(value) = value {
        *target = Set(blank_to_none(Some(value)));
    }
}

pub async fn count_user_menus<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<i64> {
    let count = Menus::find()
        .filter(MenuCol::UserId.eq(user_id))
        .count(conn)
        .await?;
    Ok(count as i64)
}

pub(crate) async fn quota_for(state: &AppState, owner: &UserModel) -> AppResult<QuotaUsage> {
    let used = count_user_menus(&state.orm, owner.id).await?;
    Ok(QuotaUsage::compute(owner.is_admin, owner.menu_quota, used))
}

/// Load a menu the caller owns (admins may load any).
pub(crate) async fn find_owned_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<MenuModel> {
    let menu = Menus::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if menu.user_id != user.user_id {
        require_admin(state, user).await?;
    }
    Ok(menu)
}

pub async fn quota_usage(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<QuotaUsage>> {
    let owner = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;
    let usage = quota_for(state, &owner).await?;
    Ok(ApiResponse::success("Menu quota", usage, Some(Meta::empty())))
}

pub async fn list_user_menus(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<MenuList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Menus::find()
        .filter(MenuCol::UserId.eq(user.user_id))
        .order_by_desc(MenuCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Menu::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Menus", MenuList { items }, Some(meta)))
}

pub async fn create_menu(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    let CreateMenuRequest {
        name,
        banner_color,
        banner_image,
        banner_link,
        show_link_button,
        background_color,
        text_color,
        title_position,
        font_family,
        body_background_color,
        items,
        social_media,
    } = payload;

    let menu_id = Uuid::new_v4();
    let mut new_items = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        new_items.push(product_service::new_item(menu_id, index as i32, item)?);
    }

    let active = MenuActive {
        id: Set(menu_id),
        name: Set(or_default(name, DEFAULT_MENU_NAME)),
        banner_color: Set(or_default(banner_color, DEFAULT_BANNER_COLOR)),
        banner_image: Set(blank_to_none(banner_image)),
        banner_link: Set(blank_to_none(banner_link)),
        show_link_button: Set(show_link_button.unwrap_or(true)),
        background_color: Set(Some(or_default(background_color, DEFAULT_BACKGROUND_COLOR))),
        text_color: Set(Some(or_default(text_color, DEFAULT_TEXT_COLOR))),
        title_position: Set(Some(title_position.unwrap_or_default().as_str().to_string())),
        font_family: Set(Some(or_default(font_family, DEFAULT_FONT_FAMILY))),
        body_background_color: Set(Some(or_default(
            body_background_color,
            DEFAULT_BODY_BACKGROUND_COLOR,
        ))),
        user_id: Set(user.user_id),
        created_at: NotSet,
    };

    let item_count = new_items.len();
    let txn = state.orm.begin().await?;
    // The owner row lock serializes creates per user, so the count below
    // cannot go stale before the insert commits.
    let owner = Users::find_by_id(user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;
    let used = count_user_menus(&txn, owner.id).await?;
    let usage = QuotaUsage::compute(owner.is_admin, owner.menu_quota, used);
    if !usage.can_create {
        return Err(AppError::QuotaExceeded(format!(
            "Menu quota reached ({} of {})",
            usage.used, usage.quota
        )));
    }

    let menu = active.insert(&txn).await?;
    for item in new_items {
        item.insert(&txn).await?;
    }
    if let Some(handles) = social_media.filter(|s| !s.is_empty()) {
        social_service::upsert_for_menu(&txn, menu.id, handles).await?;
    }
    txn.commit().await?;

    tracing::info!(menu_id = %menu.id, user_id = %owner.id, items = item_count, "menu created");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_create",
        "menus",
        serde_json::json!({ "menu_id": menu.id, "items": item_count }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu created",
        Menu::from(menu),
        Some(Meta::empty()),
    ))
}

pub async fn get_menu(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Menu>> {
    let menu = find_owned_menu(state, user, id).await?;
    Ok(ApiResponse::success("Menu", Menu::from(menu), None))
}

pub async fn update_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuRequest,
) -> AppResult<ApiResponse<Menu>> {
    let existing = find_owned_menu(state, user, id).await?;
    let old_banner = existing.banner_image.clone();

    let mut active: MenuActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name.to_string());
    }
    if let Some(color) = payload.banner_color {
        active.banner_color = Set(or_default(Some(color), DEFAULT_BANNER_COLOR));
    }
    if let Some(show) = payload.show_link_button {
        active.show_link_button = Set(show);
    }
    if let Some(position) = payload.title_position {
        active.title_position = Set(Some(position.as_str().to_string()));
    }
    set_nullable(&mut active.banner_image, payload.banner_image);
    set_nullable(&mut active.banner_link, payload.banner_link);
    set_nullable(&mut active.background_color, payload.background_color);
    set_nullable(&mut active.text_color, payload.text_color);
    set_nullable(&mut active.font_family, payload.font_family);
    set_nullable(&mut active.body_background_color, payload.body_background_color);

    let menu = active.update(&state.orm).await?;

    if let Some(old) = old_banner.filter(|old| menu.banner_image.as_ref() != Some(old)) {
        upload_service::release_image(state, &old).await;
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_update",
        "menus",
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Menu::from(menu),
        Some(Meta::empty()),
    ))
}

/// Delete the rows belonging to `menus` and return image URLs left to clean up.
pub(crate) async fn remove_menus<C: ConnectionTrait>(
    conn: &C,
    menus: &[MenuModel],
) -> AppResult<Vec<String>> {
    let ids: Vec<Uuid> = menus.iter().map(|m| m.id).collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut images: Vec<String> = menus
        .iter()
        .filter_map(|m| m.banner_image.clone())
        .collect();
    let items = Products::find()
        .filter(ProductCol::MenuId.is_in(ids.clone()))
        .all(conn)
        .await?;
    images.extend(items.into_iter().filter_map(|p| p.image_url));

    Products::delete_many()
        .filter(ProductCol::MenuId.is_in(ids.clone()))
        .exec(conn)
        .await?;
    SocialMedia::delete_many()
        .filter(SocialCol::MenuId.is_in(ids.clone()))
        .exec(conn)
        .await?;
    Menus::delete_many()
        .filter(MenuCol::Id.is_in(ids))
        .exec(conn)
        .await?;

    Ok(images)
}

/// Cascade-delete one menu, then drop its images from storage.
pub(crate) async fn delete_menu_cascade(state: &AppState, menu: MenuModel) -> AppResult<()> {
    let txn = state.orm.begin().await?;
    let images = remove_menus(&txn, std::slice::from_ref(&menu)).await?;
    txn.commit().await?;

    for url in &images {
        upload_service::release_image(state, url).await;
    }
    tracing::info!(menu_id = %menu.id, images = images.len(), "menu deleted");
    Ok(())
}

pub async fn delete_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let menu = find_owned_menu(state, user, id).await?;
    delete_menu_cascade(state, menu).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_delete",
        "menus",
        serde_json::json!({ "menu_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{
        AdminMenu, AdminMenuList, CreateUserRequest, UpdateUserRequest, UserList, UserSummary,
    },
    entity::{
        menus::{Column as MenuCol, Entity as Menus, Model as MenuModel},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, require_admin},
    models::{Menu, User},
    response::{ApiResponse, Meta},
    routes::params::{AdminMenuQuery, UserListQuery, contains_pattern},
    services::{
        auth_service::{
            email_conflict, email_taken, find_user, hash_password, normalize_email, validate_name,
            validate_password,
        },
        menu_service::{delete_menu_cascade, remove_menus},
        upload_service,
    },
    state::AppState,
};

fn validate_quota(quota: i32) -> AppResult<i32> {
    if quota < 0 {
        return Err(AppError::BadRequest("menuQuota must not be negative".into()));
    }
    Ok(quota)
}

#[derive(Debug, sqlx::FromRow)]
struct AdminMenuRow {
    id: Uuid,
    name: String,
    banner_color: String,
    banner_image: Option<String>,
    banner_link: Option<String>,
    show_link_button: bool,
    background_color: Option<String>,
    text_color: Option<String>,
    title_position: Option<String>,
    font_family: Option<String>,
    body_background_color: Option<String>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    owner_email: String,
    owner_name: String,
}

impl From<AdminMenuRow> for AdminMenu {
    fn from(row: AdminMenuRow) -> Self {
        let model = MenuModel {
            id: row.id,
            name: row.name,
            banner_color: row.banner_color,
            banner_image: row.banner_image,
            banner_link: row.banner_link,
            show_link_button: row.show_link_button,
            background_color: row.background_color,
            text_color: row.text_color,
            title_position: row.title_position,
            font_family: row.font_family,
            body_background_color: row.body_background_color,
            user_id: row.user_id,
            created_at: row.created_at.fixed_offset(),
        };
        AdminMenu {
            menu: Menu::from(model),
            owner_email: row.owner_email,
            owner_name: row.owner_name,
        }
    }
}

async fn menu_counts(state: &AppState, user_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i64)> = sqlx::query_as(
        "SELECT user_id, COUNT(*) FROM menus WHERE user_id = ANY($1) GROUP BY user_id",
    )
    .bind(user_ids)
    .fetch_all(&state.pool)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    require_admin(state, user).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if query.search.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        let pattern = contains_pattern(query.search.as_deref());
        condition = condition.add(
            Condition::any()
                .add(Expr::col(UserCol::Name).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Email).ilike(pattern)),
        );
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let users = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let counts = menu_counts(state, &ids).await?;

    let items = users
        .into_iter()
        .map(|u| {
            let menu_count = counts.get(&u.id).copied().unwrap_or(0);
            UserSummary {
                user: User::from(u),
                menu_count,
            }
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn create_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    require_admin(state, user).await?;
    let name = validate_name(&payload.name)?;
    let email = normalize_email(&payload.email)?;
    validate_password(&payload.password)?;
    let menu_quota = validate_quota(payload.menu_quota.unwrap_or(state.config.default_menu_quota))?;

    if email_taken(state, &email, None).await? {
        return Err(AppError::Conflict("Email is already taken".to_string()));
    }

    let created = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        is_admin: Set(payload.is_admin.unwrap_or(false)),
        menu_quota: Set(menu_quota),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(email_conflict)?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "admin_user_create",
        "users",
        serde_json::json!({ "user_id": created.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        User::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    require_admin(state, user).await?;
    let existing = find_user(state, id).await?;

    if id == user.user_id && payload.is_admin == Some(false) {
        return Err(AppError::BadRequest(
            "you cannot remove your own admin rights".into(),
        ));
    }

    let mut active: UserActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validate_name(&name)?);
    }
    if let Some(email) = payload.email {
        let email = normalize_email(&email)?;
        if email_taken(state, &email, Some(id)).await? {
            return Err(AppError::Conflict("Email is already taken".to_string()));
        }
        active.email = Set(email);
    }
    if let Some(password) = payload.password {
        validate_password(&password)?;
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
    }
    if let Some(quota) = payload.menu_quota {
        active.menu_quota = Set(validate_quota(quota)?);
    }

    let updated = active.update(&state.orm).await.map_err(email_conflict)?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "admin_user_update",
        "users",
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User updated",
        User::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(state, user).await?;
    if id == user.user_id {
        return Err(AppError::BadRequest("you cannot delete your own account".into()));
    }
    let target = find_user(state, id).await?;

    let txn = state.orm.begin().await?;
    let menus = Menus::find()
        .filter(MenuCol::UserId.eq(target.id))
        .all(&txn)
        .await?;
    let menu_count = menus.len();
    let images = remove_menus(&txn, &menus).await?;
    Users::delete_by_id(target.id).exec(&txn).await?;
    txn.commit().await?;

    for url in &images {
        upload_service::release_image(state, url).await;
    }
    tracing::info!(user_id = %target.id, menus = menu_count, "user deleted");

    audit::record(
        &state.pool,
        Some(user.user_id),
        "admin_user_delete",
        "users",
        serde_json::json!({ "user_id": target.id, "menus_deleted": menu_count }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "menusDeleted": menu_count }),
        Some(Meta::empty()),
    ))
}

pub async fn list_menus(
    state: &AppState,
    user: &AuthUser,
    query: AdminMenuQuery,
) -> AppResult<ApiResponse<AdminMenuList>> {
    require_admin(state, user).await?;
    let (page, limit, offset) = query.pagination().normalize();
    let field = query.filter.unwrap_or_default();
    let pattern = contains_pattern(query.search.as_deref());

    let rows = sqlx::query_as::<_, AdminMenuRow>(&format!(
        r#"
        SELECT m.id, m.name, m.banner_color, m.banner_image, m.banner_link,
               m.show_link_button, m.background_color, m.text_color, m.title_position,
               m.font_family, m.body_background_color, m.user_id, m.created_at,
               u.email AS owner_email, u.name AS owner_name
        FROM menus m
        JOIN users u ON u.id = m.user_id
        WHERE {} ILIKE $1
        ORDER BY m.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        field.as_sql()
    ))
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM menus m JOIN users u ON u.id = m.user_id WHERE {} ILIKE $1",
        field.as_sql()
    ))
    .bind(&pattern)
    .fetch_one(&state.pool)
    .await?;

    let items = rows.into_iter().map(AdminMenu::from).collect();
    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Menus", AdminMenuList { items }, Some(meta)))
}

pub async fn delete_menu(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(state, user).await?;
    let menu = Menus::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let owner_id = menu.user_id;
    delete_menu_cascade(state, menu).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "admin_menu_delete",
        "menus",
        serde_json::json!({ "menu_id": id, "owner_id": owner_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        menus::NewMenuItem,
        products::{
            AddImageRequest, CreateProductRequest, ProductList, ReorderProductsRequest,
            UpdateProductRequest,
        },
    },
    entity::products::{
        ActiveModel as ProductActive, Column as ProductCol, Entity as Products,
        Model as ProductModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ItemType, Product, blank_to_none},
    response::{ApiResponse, Meta},
    services::{menu_service::find_owned_menu, upload_service},
    state::AppState,
};

/// Name given to standalone image items.
pub const IMAGE_ITEM_NAME: &str = "Image";

pub fn validate_price(price: Option<f64>) -> AppResult<Option<f64>> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            Err(AppError::BadRequest("price must be a non-negative number".into()))
        }
        other => Ok(other),
    }
}

/// Image items must point at an image, whichever write produced them.
pub fn check_item_shape(item_type: ItemType, image_url: Option<&str>) -> AppResult<()> {
    let has_image = image_url.is_some_and(|url| !url.trim().is_empty());
    if item_type == ItemType::Image && !has_image {
        return Err(AppError::BadRequest(
            "imageUrl is required for image items".into(),
        ));
    }
    Ok(())
}

/// Build an insertable item at `order_index`, validating it for its type.
pub fn new_item(menu_id: Uuid, order_index: i32, item: NewMenuItem) -> AppResult<ProductActive> {
    let NewMenuItem {
        item_type,
        name,
        description,
        price,
        image_url,
        external_link,
    } = item;

    let image_url = blank_to_none(image_url);
    let name = match item_type {
        ItemType::Product => blank_to_none(name)
            .ok_or_else(|| AppError::BadRequest(format!("item {order_index}: name is required")))?,
        ItemType::Image => {
            check_item_shape(item_type, image_url.as_deref())
                .map_err(|_| {
                    AppError::BadRequest(format!(
                        "item {order_index}: imageUrl is required for image items"
                    ))
                })?;
            blank_to_none(name).unwrap_or_else(|| IMAGE_ITEM_NAME.to_string())
        }
    };

    Ok(ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(blank_to_none(description)),
        price: Set(validate_price(price)?),
        image_url: Set(image_url),
        external_link: Set(blank_to_none(external_link)),
        menu_id: Set(menu_id),
        order_index: Set(order_index),
        item_type: Set(item_type.as_str().to_string()),
        created_at: NotSet,
    })
}

/// The requested order must name every item of the menu exactly once.
pub fn validate_reorder(existing: &[Uuid], requested: &[Uuid]) -> AppResult<()> {
    let existing: HashSet<&Uuid> = existing.iter().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(id) {
            return Err(AppError::BadRequest(format!("duplicate product id {id}")));
        }
        if !existing.contains(id) {
            return Err(AppError::BadRequest(format!("product {id} is not in this menu")));
        }
    }
    if seen.len() != existing.len() {
        return Err(AppError::BadRequest(
            "productIds must list every item of the menu".into(),
        ));
    }
    Ok(())
}

pub(crate) async fn products_for_menu<C: ConnectionTrait>(
    conn: &C,
    menu_id: Uuid,
) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .filter(ProductCol::MenuId.eq(menu_id))
        .order_by_asc(ProductCol::OrderIndex)
        .order_by_asc(ProductCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

/// New items go to the end of the list.
async fn next_order_index(state: &AppState, menu_id: Uuid) -> AppResult<i32> {
    let count = Products::find()
        .filter(ProductCol::MenuId.eq(menu_id))
        .count(&state.orm)
        .await?;
    Ok(count as i32)
}

async fn find_owned_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ProductModel> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    find_owned_menu(state, user, product.menu_id).await?;
    Ok(product)
}

pub async fn list_menu_products(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
) -> AppResult<ApiResponse<ProductList>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let items = products_for_menu(&state.orm, menu.id).await?;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

pub async fn add_product(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let order_index = next_order_index(state, menu.id).await?;

    let item = NewMenuItem {
        item_type: ItemType::Product,
        name: Some(payload.name),
        description: payload.description,
        price: payload.price,
        image_url: payload.image_url,
        external_link: payload.external_link,
    };
    let product = new_item(menu.id, order_index, item)?.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_add",
        "products",
        serde_json::json!({ "menu_id": menu.id, "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product added",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn add_image(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: AddImageRequest,
) -> AppResult<ApiResponse<Product>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let order_index = next_order_index(state, menu.id).await?;

    let item = NewMenuItem {
        item_type: ItemType::Image,
        image_url: Some(payload.image_url),
        ..NewMenuItem::default()
    };
    let product = new_item(menu.id, order_index, item)?.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "image_add",
        "products",
        serde_json::json!({ "menu_id": menu.id, "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image added",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_owned_product(state, user, id).await?;
    let old_image = existing.image_url.clone();

    let final_type = payload
        .item_type
        .unwrap_or_else(|| ItemType::from_db(&existing.item_type));
    let final_image = payload.image_url.as_deref().or(existing.image_url.as_deref());
    check_item_shape(final_type, final_image)?;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name.to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(blank_to_none(Some(description)));
    }
    if payload.price.is_some() {
        active.price = Set(validate_price(payload.price)?);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(blank_to_none(Some(image_url)));
    }
    if let Some(link) = payload.external_link {
        active.external_link = Set(blank_to_none(Some(link)));
    }
    if let Some(item_type) = payload.item_type {
        active.item_type = Set(item_type.as_str().to_string());
    }

    let product = active.update(&state.orm).await?;

    if let Some(old) = old_image.filter(|old| product.image_url.as_ref() != Some(old)) {
        upload_service::release_image(state, &old).await;
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = find_owned_product(state, user, id).await?;
    let result = Products::delete_by_id(product.id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Some(url) = product.image_url.as_deref() {
        upload_service::release_image(state, url).await;
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id, "menu_id": product.menu_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn reorder_products(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: ReorderProductsRequest,
) -> AppResult<ApiResponse<ProductList>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let existing: Vec<Uuid> = products_for_menu(&state.orm, menu.id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    validate_reorder(&existing, &payload.product_ids)?;

    let txn = state.orm.begin().await?;
    for (index, id) in payload.product_ids.iter().enumerate() {
        Products::update_many()
            .col_expr(ProductCol::OrderIndex, Expr::value(index as i32))
            .filter(ProductCol::Id.eq(*id))
            .filter(ProductCol::MenuId.eq(menu.id))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_reorder",
        "products",
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    let items = products_for_menu(&state.orm, menu.id).await?;
    Ok(ApiResponse::success(
        "Reordered",
        ProductList { items },
        Some(Meta::empty()),
    ))
}

use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    entity::menus::Entity as Menus,
    error::{AppError, AppResult},
    models::{Menu, PublicMenu},
    response::ApiResponse,
    services::{product_service::products_for_menu, social_service::social_for_menu},
    state::AppState,
};

/// Read-only view of a published menu. Item and social lookups degrade to
/// empty values instead of failing the page.
pub async fn get_public_menu(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PublicMenu>> {
    let menu = Menus::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let products = match products_for_menu(&state.orm, menu.id).await {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, menu_id = %menu.id, "loading public menu items failed");
            Vec::new()
        }
    };

    let social_media = match social_for_menu(&state.orm, menu.id).await {
        Ok(social) => social,
        Err(err) => {
            tracing::warn!(error = %err, menu_id = %menu.id, "loading public social media failed");
            None
        }
    };

    let data = PublicMenu {
        menu: Menu::from(menu),
        products,
        social_media,
    };
    Ok(ApiResponse::success("Menu", data, None))
}

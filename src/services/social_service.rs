use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::social::UpsertSocialMediaRequest,
    entity::social_media::{
        ActiveModel as SocialActive, Column as SocialCol, Entity as SocialMediaRows,
        Model as SocialModel,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{SocialMedia, blank_to_none},
    response::{ApiResponse, Meta},
    services::menu_service::find_owned_menu,
    state::AppState,
};

pub(crate) async fn social_for_menu<C: ConnectionTrait>(
    conn: &C,
    menu_id: Uuid,
) -> AppResult<Option<SocialMedia>> {
    let row = SocialMediaRows::find()
        .filter(SocialCol::MenuId.eq(menu_id))
        .one(conn)
        .await?;
    Ok(row.map(SocialMedia::from))
}

/// Update the menu's row if there is one, insert it otherwise.
pub(crate) async fn upsert_for_menu<C: ConnectionTrait>(
    conn: &C,
    menu_id: Uuid,
    payload: UpsertSocialMediaRequest,
) -> AppResult<SocialModel> {
    let existing = SocialMediaRows::find()
        .filter(SocialCol::MenuId.eq(menu_id))
        .one(conn)
        .await?;

    let instagram = blank_to_none(payload.instagram);
    let facebook = blank_to_none(payload.facebook);
    let twitter = blank_to_none(payload.twitter);

    let row = match existing {
        Some(row) => {
            let mut active: SocialActive = row.into();
            active.instagram = Set(instagram);
            active.facebook = Set(facebook);
            active.twitter = Set(twitter);
            active.update(conn).await?
        }
        None => {
            SocialActive {
                id: Set(Uuid::new_v4()),
                menu_id: Set(menu_id),
                instagram: Set(instagram),
                facebook: Set(facebook),
                twitter: Set(twitter),
                created_at: NotSet,
            }
            .insert(conn)
            .await?
        }
    };
    Ok(row)
}

pub async fn get_menu_social_media(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
) -> AppResult<ApiResponse<Option<SocialMedia>>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let social = social_for_menu(&state.orm, menu.id).await?;
    Ok(ApiResponse::success("Social media", social, None))
}

pub async fn upsert_social_media(
    state: &AppState,
    user: &AuthUser,
    menu_id: Uuid,
    payload: UpsertSocialMediaRequest,
) -> AppResult<ApiResponse<SocialMedia>> {
    let menu = find_owned_menu(state, user, menu_id).await?;
    let row = upsert_for_menu(&state.orm, menu.id, payload).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "social_media_upsert",
        "social_media",
        serde_json::json!({ "menu_id": menu.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Social media saved",
        SocialMedia::from(row),
        Some(Meta::empty()),
    ))
}

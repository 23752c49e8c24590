use uuid::Uuid;

use crate::{
    audit,
    db::DbPool,
    dto::uploads::{DeleteImageRequest, DeleteImageResult, ImageUpload, UploadedImage},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, is_confirmed_admin},
    response::{ApiResponse, Meta},
    state::AppState,
    storage::{DEFAULT_FOLDER, storage_key},
};

/// Absent content types pass; the extension check in storage still applies.
/// SVG is refused.
pub fn ensure_image_content_type(content_type: Option<&str>) -> AppResult<()> {
    let Some(ct) = content_type else {
        return Ok(());
    };
    let normalized = ct.trim().to_ascii_lowercase();
    let essence = normalized.split(';').next().unwrap_or_default().trim();
    if !essence.starts_with("image/") || essence == "image/svg+xml" {
        return Err(AppError::BadRequest(format!(
            "unsupported content type {ct}, expected a raster image"
        )));
    }
    Ok(())
}

/// True when a menu banner or item still points at the stored file `key`,
/// in any spelling of its URL. `except_owner` skips that user's menus.
pub(crate) async fn image_referenced(
    pool: &DbPool,
    key: &str,
    except_owner: Option<Uuid>,
) -> AppResult<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM menus
            WHERE strpos(banner_image, $1) > 0
              AND ($2::uuid IS NULL OR user_id <> $2)
            UNION ALL
            SELECT 1 FROM products p JOIN menus m ON m.id = p.menu_id
            WHERE strpos(p.image_url, $1) > 0
              AND ($2::uuid IS NULL OR m.user_id <> $2)
        )
        "#,
    )
    .bind(key)
    .bind(except_owner)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Drop a file that a menu or item stopped using, unless something else
/// still points at it. Runs after commit, so failures only warn.
pub(crate) async fn release_image(state: &AppState, url: &str) {
    let Some(key) = storage_key(url) else {
        return;
    };
    match image_referenced(&state.pool, &key, None).await {
        Ok(false) => state.images.delete_quietly(url).await,
        Ok(true) => tracing::debug!(%key, "image still referenced, keeping file"),
        Err(err) => tracing::warn!(%key, error = %err, "reference check failed, keeping file"),
    }
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    upload: ImageUpload,
) -> AppResult<ApiResponse<UploadedImage>> {
    ensure_image_content_type(upload.content_type.as_deref())?;
    let folder = upload
        .folder
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOLDER);

    let url = state
        .images
        .save(folder, upload.file_name.as_deref(), &upload.bytes)
        .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "image_upload",
        "uploads",
        serde_json::json!({ "url": url, "size": upload.bytes.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Uploaded",
        UploadedImage { url },
        Some(Meta::empty()),
    ))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    payload: DeleteImageRequest,
) -> AppResult<ApiResponse<DeleteImageResult>> {
    let url = payload.url.trim();
    if url.is_empty() {
        return Err(AppError::BadRequest("url is required".into()));
    }
    let Some(key) = storage_key(url) else {
        tracing::debug!(url, "not a stored image url");
        return Ok(ApiResponse::success(
            "Nothing to delete",
            DeleteImageResult { deleted: false },
            Some(Meta::empty()),
        ));
    };
    if !is_confirmed_admin(state, user).await?
        && image_referenced(&state.pool, &key, Some(user.user_id)).await?
    {
        return Err(AppError::Forbidden);
    }

    let deleted = state.images.delete(url).await?;
    if deleted {
        audit::record(
            &state.pool,
            Some(user.user_id),
            "image_delete",
            "uploads",
            serde_json::json!({ "url": url }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        if deleted { "Deleted" } else { "Nothing to delete" },
        DeleteImageResult { deleted },
        Some(Meta::empty()),
    ))
}

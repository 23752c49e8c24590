use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};

use crate::{
    dto::uploads::{DeleteImageRequest, DeleteImageResult, ImageUpload, UploadedImage},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::upload_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_image).delete(delete_image))
}

/// Collect the `file` part and the optional `folder` field.
async fn read_upload(mut multipart: Multipart) -> AppResult<ImageUpload> {
    let mut upload = ImageUpload::default();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "folder" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("invalid folder: {e}")))?;
                upload.folder = Some(text);
            }
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("failed to read file: {e}")))?
                    .to_vec();
                has_file = true;
            }
            _ => {}
        }
    }

    if !has_file {
        return Err(AppError::BadRequest("file is required".into()));
    }
    Ok(upload)
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body(content_type = "multipart/form-data", description = "`file` part plus optional `folder` field"),
    responses(
        (status = 200, description = "Stored image URL", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing or non-image file")
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImage>>> {
    let upload = read_upload(multipart).await?;
    tracing::debug!(
        user_id = %user.user_id,
        file = ?upload.file_name,
        size = upload.bytes.len(),
        "image upload received"
    );
    let resp = upload_service::upload_image(&state, &user, upload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/uploads",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Whether a stored file was removed", body = ApiResponse<DeleteImageResult>),
        (status = 403, description = "Image belongs to another user's menu")
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteImageRequest>,
) -> AppResult<Json<ApiResponse<DeleteImageResult>>> {
    let resp = upload_service::delete_image(&state, &user, payload).await?;
    Ok(Json(resp))
}

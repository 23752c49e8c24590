use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteImageRequest {
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteImageResult {
    pub deleted: bool,
}

/// A file pulled out of the multipart body, ready to be stored.
#[derive(Debug, Default)]
pub struct ImageUpload {
    pub folder: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

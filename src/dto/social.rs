use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpsertSocialMediaRequest {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
}

impl UpsertSocialMediaRequest {
    pub fn is_empty(&self) -> bool {
        [&self.instagram, &self.facebook, &self.twitter]
            .iter()
            .all(|handle| handle.as_deref().is_none_or(|h| h.trim().is_empty()))
    }
}

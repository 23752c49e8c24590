use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::social::UpsertSocialMediaRequest,
    models::{ItemType, Menu, TitlePosition},
};

/// Optional fields left out fall back to the editor defaults.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuRequest {
    pub name: Option<String>,
    pub banner_color: Option<String>,
    pub banner_image: Option<String>,
    pub banner_link: Option<String>,
    pub show_link_button: Option<bool>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub title_position: Option<TitlePosition>,
    pub font_family: Option<String>,
    pub body_background_color: Option<String>,
    /// Items in display order; `orderIndex` is the position in this list.
    #[serde(default)]
    pub items: Vec<NewMenuItem>,
    pub social_media: Option<UpsertSocialMediaRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
}

/// Absent fields are left unchanged. An empty string clears a nullable field.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub banner_color: Option<String>,
    pub banner_image: Option<String>,
    pub banner_link: Option<String>,
    pub show_link_button: Option<bool>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub title_position: Option<TitlePosition>,
    pub font_family: Option<String>,
    pub body_background_color: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuList {
    #[schema(value_type = Vec<Menu>)]
    pub items: Vec<Menu>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotaUsage {
    pub used: i64,
    pub quota: i32,
    pub unlimited: bool,
    pub can_create: bool,
    pub percentage: f64,
}

impl QuotaUsage {
    pub fn compute(is_admin: bool, quota: i32, used: i64) -> Self {
        let can_create = is_admin || used < i64::from(quota);
        let percentage = if is_admin || quota <= 0 {
            100.0
        } else {
            (used as f64 / f64::from(quota) * 100.0).min(100.0)
        };
        Self {
            used,
            quota,
            unlimited: is_admin,
            can_create,
            percentage,
        }
    }
}

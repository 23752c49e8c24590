use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{menus, products, social_media, users};

/// Where the menu title is drawn relative to the banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TitlePosition {
    #[default]
    Banner,
    Below,
    Hidden,
}

impl TitlePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitlePosition::Banner => "banner",
            TitlePosition::Below => "below",
            TitlePosition::Hidden => "hidden",
        }
    }

    /// Unknown or missing values read as `banner`.
    pub fn from_db(value: Option<&str>) -> Self {
        match value {
            Some("below") => TitlePosition::Below,
            Some("hidden") => TitlePosition::Hidden,
            _ => TitlePosition::Banner,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Product,
    Image,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Product => "product",
            ItemType::Image => "image",
        }
    }

    /// Unknown values read as `product`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "image" => ItemType::Image,
            _ => ItemType::Product,
        }
    }
}

/// Trim and map empty strings to `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub menu_quota: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: Uuid,
    pub name: String,
    pub banner_color: Option<String>,
    pub banner_image: Option<String>,
    pub banner_link: Option<String>,
    pub show_link_button: bool,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub title_position: TitlePosition,
    pub font_family: Option<String>,
    pub body_background_color: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub menu_id: Uuid,
    pub order_index: i32,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
}

/// Everything the public page needs to render a menu.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicMenu {
    pub menu: Menu,
    pub products: Vec<Product>,
    pub social_media: Option<SocialMedia>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            is_admin: model.is_admin,
            menu_quota: model.menu_quota,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<menus::Model> for Menu {
    fn from(model: menus::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            banner_color: blank_to_none(Some(model.banner_color)),
            banner_image: blank_to_none(model.banner_image),
            banner_link: blank_to_none(model.banner_link),
            show_link_button: model.show_link_button,
            background_color: blank_to_none(model.background_color),
            text_color: blank_to_none(model.text_color),
            title_position: TitlePosition::from_db(model.title_position.as_deref()),
            font_family: blank_to_none(model.font_family),
            body_background_color: blank_to_none(model.body_background_color),
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            image_url: model.image_url,
            external_link: model.external_link,
            menu_id: model.menu_id,
            order_index: model.order_index,
            item_type: ItemType::from_db(&model.item_type),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<social_media::Model> for SocialMedia {
    fn from(model: social_media::Model) -> Self {
        Self {
            id: model.id,
            menu_id: model.menu_id,
            instagram: blank_to_none(model.instagram),
            facebook: blank_to_none(model.facebook),
            twitter: blank_to_none(model.twitter),
        }
    }
}

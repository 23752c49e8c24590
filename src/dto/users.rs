use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Menu, User};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_admin: Option<bool>,
    pub menu_quota: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub menu_quota: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    pub menu_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<UserSummary>)]
    pub items: Vec<UserSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminMenu {
    #[serde(flatten)]
    pub menu: Menu,
    pub owner_email: String,
    pub owner_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AdminMenuList {
    #[schema(value_type = Vec<AdminMenu>)]
    pub items: Vec<AdminMenu>,
}

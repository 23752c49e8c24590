pub mod admin_service;
pub mod auth_service;
pub mod menu_service;
pub mod product_service;
pub mod public_service;
pub mod social_service;
pub mod upload_service;

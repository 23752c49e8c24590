pub mod auth;
pub mod menus;
pub mod products;
pub mod social;
pub mod uploads;
pub mod users;

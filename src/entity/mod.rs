pub mod audit_logs;
pub mod menus;
pub mod products;
pub mod social_media;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use menus::Entity as Menus;
pub use products::Entity as Products;
pub use social_media::Entity as SocialMedia;
pub use users::Entity as Users;

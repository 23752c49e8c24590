use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, MeResponse, RegisterRequest},
        menus::{CreateMenuRequest, MenuList, NewMenuItem, QuotaUsage, UpdateMenuRequest},
        products::{AddImageRequest, CreateProductRequest, ProductList, ReorderProductsRequest, UpdateProductRequest},
        social::UpsertSocialMediaRequest,
        uploads::{DeleteImageRequest, DeleteImageResult, UploadedImage},
        users::{AdminMenu, AdminMenuList, CreateUserRequest, UpdateUserRequest, UserList, UserSummary},
    },
    models::{ItemType, Menu, Product, PublicMenu, SocialMedia, TitlePosition, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, menus, params, products, public, uploads},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        menus::list_menus,
        menus::create_menu,
        menus::quota,
        menus::get_menu,
        menus::update_menu,
        menus::delete_menu,
        menus::list_products,
        menus::add_product,
        menus::add_image,
        menus::reorder_products,
        menus::get_social_media,
        menus::upsert_social_media,
        products::update_product,
        products::delete_product,
        public::get_public_menu,
        admin::list_users,
        admin::create_user,
        admin::update_user,
        admin::delete_user,
        admin::list_all_menus,
        admin::delete_any_menu,
        uploads::upload_image,
        uploads::delete_image
    ),
    components(
        schemas(
            User,
            Menu,
            Product,
            SocialMedia,
            PublicMenu,
            TitlePosition,
            ItemType,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MeResponse,
            CreateMenuRequest,
            NewMenuItem,
            UpdateMenuRequest,
            MenuList,
            QuotaUsage,
            CreateProductRequest,
            AddImageRequest,
            UpdateProductRequest,
            ReorderProductsRequest,
            ProductList,
            UpsertSocialMediaRequest,
            UploadedImage,
            DeleteImageRequest,
            DeleteImageResult,
            CreateUserRequest,
            UpdateUserRequest,
            UserSummary,
            UserList,
            AdminMenu,
            AdminMenuList,
            params::Pagination,
            params::MenuSearchField,
            health::HealthData,
            Meta,
            ApiResponse<Menu>,
            ApiResponse<MenuList>,
            ApiResponse<ProductList>,
            ApiResponse<PublicMenu>,
            ApiResponse<UserList>,
            ApiResponse<AdminMenuList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Menus", description = "Menu boards owned by the caller"),
        (name = "Products", description = "Menu items: products and images"),
        (name = "Social media", description = "Social handles shown on a menu"),
        (name = "Public", description = "Unauthenticated menu view"),
        (name = "Admin", description = "User and menu administration"),
        (name = "Uploads", description = "Image storage"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

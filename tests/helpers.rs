use menu_board_api::{
    config::AppConfig,
    dto::{
        menus::{CreateMenuRequest, NewMenuItem, QuotaUsage},
        social::UpsertSocialMediaRequest,
    },
    error::AppError,
    middleware::auth::decode_token,
    models::{ItemType, Product, TitlePosition, blank_to_none},
    response::{Meta, total_pages},
    routes::params::{AdminMenuQuery, MenuSearchField, Pagination, contains_pattern, escape_like},
    services::{
        auth_service::{hash_password, issue_token, normalize_email, validate_password, verify_password},
        product_service::{check_item_shape, new_item, validate_price, validate_reorder},
    },
};
use sea_orm::ActiveValue;
use std::collections::HashMap;
use uuid::Uuid;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn pagination_defaults_and_clamps() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));

    let p = Pagination { page: Some(0), per_page: Some(500) };
    assert_eq!(p.normalize(), (1, 100, 0));

    let p = Pagination { page: Some(3), per_page: Some(0) };
    assert_eq!(p.normalize(), (3, 1, 2));
}

#[test]
fn pagination_reads_camel_case_and_snake_case() {
    let p: Pagination = serde_json::from_str(r#"{"page":2,"perPage":5}"#).unwrap();
    assert_eq!(p.normalize(), (2, 5, 5));

    let p: Pagination = serde_json::from_str(r#"{"per_page":7}"#).unwrap();
    assert_eq!(p.per_page, Some(7));
}

#[test]
fn total_pages_rounds_up() {
    assert_eq!(total_pages(0, 20), 0);
    assert_eq!(total_pages(20, 20), 1);
    assert_eq!(total_pages(21, 20), 2);
    assert_eq!(total_pages(5, 0), 0);
    assert_eq!(Meta::new(2, 10, 35).total_pages, Some(4));
}

#[test]
fn meta_serializes_camel_case() {
    let json = serde_json::to_value(Meta::new(1, 20, 41)).unwrap();
    assert_eq!(json["perPage"], 20);
    assert_eq!(json["totalPages"], 3);
}

#[test]
fn quota_usage_for_regular_users() {
    let usage = QuotaUsage::compute(false, 3, 1);
    assert!(usage.can_create);
    assert!(!usage.unlimited);
    assert!((usage.percentage - 100.0 / 3.0).abs() < 1e-9);

    let full = QuotaUsage::compute(false, 3, 3);
    assert!(!full.can_create);
    assert_eq!(full.percentage, 100.0);

    let over = QuotaUsage::compute(false, 2, 5);
    assert_eq!(over.percentage, 100.0);
}

#[test]
fn quota_usage_for_admins_and_zero_quota() {
    let admin = QuotaUsage::compute(true, 0, 12);
    assert!(admin.can_create);
    assert!(admin.unlimited);
    assert_eq!(admin.percentage, 100.0);

    let zero = QuotaUsage::compute(false, 0, 0);
    assert!(!zero.can_create);
    assert_eq!(zero.percentage, 100.0);
}

#[test]
fn like_patterns_escape_wildcards() {
    assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    assert_eq!(contains_pattern(Some("  Pizza ")), "%Pizza%");
    assert_eq!(contains_pattern(Some("   ")), "%");
    assert_eq!(contains_pattern(None), "%");
}

#[test]
fn admin_menu_filter_parses_camel_case() {
    let q: AdminMenuQuery =
        serde_json::from_str(r#"{"search":"a","filter":"ownerEmail","perPage":10}"#).unwrap();
    assert_eq!(q.filter, Some(MenuSearchField::OwnerEmail));
    assert_eq!(q.pagination().normalize(), (1, 10, 0));
    assert_eq!(MenuSearchField::default().as_sql(), "m.name");
    assert_eq!(MenuSearchField::OwnerId.as_sql(), "m.user_id::text");
}

#[test]
fn config_requires_database_url_and_secret() {
    assert!(AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s")])).is_err());
    assert!(AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).is_err());
    assert!(
        AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "")]))
            .is_err()
    );
}

#[test]
fn config_defaults_and_fallbacks() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("DATABASE_URL", "postgres://localhost/menus"),
        ("JWT_SECRET", "secret"),
        ("APP_PORT", "not-a-port"),
        ("DEFAULT_MENU_QUOTA", "-2"),
        ("PUBLIC_BASE_URL", "https://menus.example.com/"),
    ]))
    .unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.jwt_ttl_hours, 24);
    assert_eq!(config.default_menu_quota, 3);
    assert_eq!(config.upload_dir, "uploads");
    assert_eq!(config.public_base_url, "https://menus.example.com");
    assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
}

#[test]
fn enums_fall_back_to_defaults() {
    assert_eq!(TitlePosition::from_db(None), TitlePosition::Banner);
    assert_eq!(TitlePosition::from_db(Some("below")), TitlePosition::Below);
    assert_eq!(TitlePosition::from_db(Some("sideways")), TitlePosition::Banner);
    assert_eq!(ItemType::from_db("image"), ItemType::Image);
    assert_eq!(ItemType::from_db("other"), ItemType::Product);
    assert_eq!(serde_json::to_value(TitlePosition::Hidden).unwrap(), "hidden");
}

#[test]
fn blank_strings_become_none() {
    assert_eq!(blank_to_none(Some("  ".into())), None);
    assert_eq!(blank_to_none(Some(" x ".into())), Some("x".into()));
    assert_eq!(blank_to_none(None), None);
}

#[test]
fn social_request_emptiness() {
    assert!(UpsertSocialMediaRequest::default().is_empty());
    let handles = UpsertSocialMediaRequest {
        instagram: Some(" ".into()),
        facebook: None,
        twitter: Some("menuboard".into()),
    };
    assert!(!handles.is_empty());
}

#[test]
fn create_menu_request_accepts_items_with_type() {
    let req: CreateMenuRequest = serde_json::from_str(
        r#"{
            "name": "Lunch",
            "titlePosition": "below",
            "items": [
                {"name": "Soup", "price": 4.5},
                {"type": "image", "imageUrl": "/uploads/images/a.png"}
            ],
            "socialMedia": {"instagram": "lunch"}
        }"#,
    )
    .unwrap();

    assert_eq!(req.title_position, Some(TitlePosition::Below));
    assert_eq!(req.items.len(), 2);
    assert_eq!(req.items[0].item_type, ItemType::Product);
    assert_eq!(req.items[1].item_type, ItemType::Image);
    assert!(req.social_media.is_some());
}

#[test]
fn price_must_be_finite_and_non_negative() {
    assert_eq!(validate_price(None).unwrap(), None);
    assert_eq!(validate_price(Some(0.0)).unwrap(), Some(0.0));
    assert!(matches!(validate_price(Some(-1.0)), Err(AppError::BadRequest(_))));
    assert!(validate_price(Some(f64::NAN)).is_err());
}

#[test]
fn new_item_validates_by_type() {
    let menu_id = Uuid::new_v4();

    let missing_name = NewMenuItem::default();
    assert!(matches!(new_item(menu_id, 0, missing_name), Err(AppError::BadRequest(_))));

    let image_without_url = NewMenuItem {
        item_type: ItemType::Image,
        ..NewMenuItem::default()
    };
    assert!(new_item(menu_id, 0, image_without_url).is_err());

    let image = NewMenuItem {
        item_type: ItemType::Image,
        image_url: Some("/uploads/images/a.png".into()),
        ..NewMenuItem::default()
    };
    let active = new_item(menu_id, 4, image).unwrap();
    assert!(matches!(&active.name, ActiveValue::Set(name) if name == "Image"));
    assert!(matches!(active.order_index, ActiveValue::Set(4)));
    assert!(matches!(&active.item_type, ActiveValue::Set(t) if t == "image"));

    let product = NewMenuItem {
        name: Some(" Soup ".into()),
        description: Some("".into()),
        ..NewMenuItem::default()
    };
    let active = new_item(menu_id, 0, product).unwrap();
    assert!(matches!(&active.name, ActiveValue::Set(name) if name == "Soup"));
    assert!(matches!(active.description, ActiveValue::Set(None)));
}

#[test]
fn image_items_always_need_an_image() {
    assert!(check_item_shape(ItemType::Product, None).is_ok());
    assert!(check_item_shape(ItemType::Image, Some("/uploads/images/a.png")).is_ok());
    assert!(matches!(
        check_item_shape(ItemType::Image, None),
        Err(AppError::BadRequest(_))
    ));
    assert!(check_item_shape(ItemType::Image, Some("  ")).is_err());
}

#[test]
fn reorder_requires_exact_id_set() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    let existing = [a, b, c];

    assert!(validate_reorder(&existing, &[c, a, b]).is_ok());
    assert!(validate_reorder(&existing, &[a, b]).is_err());
    assert!(validate_reorder(&existing, &[a, a, b]).is_err());
    assert!(validate_reorder(&existing, &[a, b, Uuid::new_v4()]).is_err());
    assert!(validate_reorder(&[], &[]).is_ok());
}

#[test]
fn emails_are_normalized() {
    assert_eq!(normalize_email("  Chef@Example.COM ").unwrap(), "chef@example.com");
    assert!(normalize_email("no-at-sign").is_err());
    assert!(normalize_email("@example.com").is_err());
    assert!(normalize_email("a@b@c").is_err());
    assert!(validate_password("12345").is_err());
    assert!(validate_password("123456").is_ok());
}

#[test]
fn password_hash_round_trip() {
    let hash = hash_password("s3cret!").unwrap();
    assert!(verify_password("s3cret!", &hash).unwrap());
    assert!(!verify_password("wrong", &hash).unwrap());
}

#[test]
fn tokens_carry_user_and_role() {
    let user_id = Uuid::new_v4();
    let token = issue_token(user_id, true, "secret", 1).unwrap();

    let user = decode_token(&token, "secret").unwrap();
    assert_eq!(user.user_id, user_id);
    assert!(user.is_admin());

    assert!(matches!(
        decode_token(&token, "other-secret"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn products_serialize_camel_case_with_type_key() {
    let product = Product {
        id: Uuid::nil(),
        name: "Soup".into(),
        description: None,
        price: Some(4.5),
        image_url: Some("/uploads/images/soup.png".into()),
        external_link: None,
        menu_id: Uuid::nil(),
        order_index: 2,
        item_type: ItemType::Product,
        created_at: chrono::Utc::now(),
    };
    let json = serde_json::to_value(&product).unwrap();

    assert_eq!(json["imageUrl"], "/uploads/images/soup.png");
    assert_eq!(json["orderIndex"], 2);
    assert_eq!(json["type"], "product");
    assert!(json.get("item_type").is_none());
    assert!(json["externalLink"].is_null());
}

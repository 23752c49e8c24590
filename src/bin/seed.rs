use menu_board_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

const DEMO_MENU_NAME: &str = "Demo Bistro";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let admin_id = ensure_user(&pool, "Admin", "admin@example.com", "admin123", true, 0).await?;
    let user_id = ensure_user(
        &pool,
        "Demo User",
        "user@example.com",
        "user123",
        false,
        config.default_menu_quota,
    )
    .await?;
    seed_demo_menu(&pool, user_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    is_admin: bool,
    menu_quota: i32,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, is_admin, menu_quota)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .bind(menu_quota)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (admin={is_admin})");
    Ok(user_id)
}

async fn seed_demo_menu(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM menus WHERE user_id = $1 AND name = $2")
            .bind(owner_id)
            .bind(DEMO_MENU_NAME)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        println!("Demo menu already present");
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let menu_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO menus (id, name, banner_color, background_color, text_color,
                           title_position, font_family, body_background_color, user_id)
        VALUES ($1, $2, '#E5324B', '#ffffff', '#333333', 'banner', 'Poppins', '#f5f5f5', $3)
        "#,
    )
    .bind(menu_id)
    .bind(DEMO_MENU_NAME)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?;

    let items = [
        ("Margherita", Some("Tomato, mozzarella, basil"), Some(9.5)),
        ("Caesar Salad", Some("Romaine, parmesan, croutons"), Some(7.0)),
        ("Tiramisu", None, Some(5.5)),
    ];
    for (index, (name, description, price)) in items.into_iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, menu_id, order_index, type)
            VALUES ($1, $2, $3, $4, $5, $6, 'product')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(menu_id)
        .bind(index as i32)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("INSERT INTO social_media (id, menu_id, instagram) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(menu_id)
        .bind("demobistro")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    println!("Seeded demo menu {menu_id}");
    Ok(())
}

#![allow(dead_code)]

use dotenv::dotenv;
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool as Pool, PgPoolOptions};
use sqlx::Error;
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use uuid::Uuid;

// Each #[tokio::test] runs on its own runtime, so only the database URL is
// shared; every test context opens its own pool.
static TEST_DB: OnceCell<Mutex<Option<TestDb>>> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct TestDb {
    pub url: String,
    pub db_name: String,
}

fn admin_url() -> String {
    dotenv().ok();
    env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set to run database tests")
}

// Same server, different database
fn url_for(db_name: &str) -> String {
    let admin = admin_url();
    let base = admin
        .rsplit_once('/')
        .map(|(base, _)| base.to_string())
        .unwrap_or(admin);
    format!("{}/{}", base, db_name)
}

async fn connect(url: &str) -> Result<Pool, Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

impl TestDb {
    /// Pool on the shared test database, creating and migrating it on first use.
    pub async fn get_instance() -> Result<Pool, Error> {
        let test_db = TEST_DB.get_or_init(|| Mutex::new(None));
        let mut guard = test_db.lock().await;

        if let Some(db) = guard.as_ref() {
            return connect(&db.url).await;
        }

        let db = Self::setup_database().await?;
        let pool = connect(&db.url).await?;
        *guard = Some(db);
        Ok(pool)
    }

    async fn setup_database() -> Result<Self, Error> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let db_name = format!("safari_test_{}", timestamp);

        let admin_pool = connect(&admin_url()).await?;
        sqlx::query(&format!("CREATE DATABASE {}", db_name))
            .execute(&admin_pool)
            .await?;

        let url = url_for(&db_name);
        let pool = connect(&url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        pool.close().await;

        Ok(Self { url, db_name })
    }

    // Teardown: drop the database after the test binary finishes
    pub fn cleanup_database_sync() -> Result<(), Error> {
        let Some(db) = TEST_DB
            .get()
            .and_then(|cell| cell.try_lock().ok().and_then(|guard| guard.clone()))
        else {
            return Ok(());
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Io)?;

        runtime.block_on(async {
            let admin_pool = connect(&admin_url()).await?;
            sqlx::query(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", db.db_name))
                .execute(&admin_pool)
                .await?;
            Ok(())
        })
    }
}

/// Unique slug so tests sharing one database never collide.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub async fn insert_destination(pool: &Pool, name: &str) -> Result<(Uuid, String), Error> {
    let slug = unique_slug(&name.to_lowercase().replace(' ', "-"));
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO destinations (slug, name, country) VALUES ($1, $2, 'Tanzania') RETURNING id",
    )
    .bind(&slug)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok((id, slug))
}

pub async fn insert_accommodation(
    pool: &Pool,
    name: &str,
    price_per_night: Decimal,
    destination_id: Option<Uuid>,
) -> Result<(Uuid, String), Error> {
    let slug = unique_slug("lodge");
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO accommodations (slug, name, location, price_per_night, amenities, destination_id)
        VALUES ($1, $2, 'Northern Circuit', $3, ARRAY['wifi', 'pool'], $4)
        RETURNING id
        "#,
    )
    .bind(&slug)
    .bind(name)
    .bind(price_per_night)
    .bind(destination_id)
    .fetch_one(pool)
    .await?;
    Ok((id, slug))
}

pub async fn insert_room(
    pool: &Pool,
    accommodation_id: Uuid,
    price_per_night: Decimal,
    max_occupancy: i32,
    available_quantity: i32,
) -> Result<Uuid, Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO rooms (accommodation_id, name, max_occupancy, price_per_night, available_quantity)
        VALUES ($1, 'Tented Suite', $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(accommodation_id)
    .bind(max_occupancy)
    .bind(price_per_night)
    .bind(available_quantity)
    .fetch_one(pool)
    .await
}

pub async fn insert_tour(
    pool: &Pool,
    title: &str,
    price: Decimal,
    max_group_size: Option<i32>,
) -> Result<(Uuid, String), Error> {
    let slug = unique_slug("tour");
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO tours (slug, title, price, duration_days, max_group_size)
        VALUES ($1, $2, $3, 3, $4)
        RETURNING id
        "#,
    )
    .bind(&slug)
    .bind(title)
    .bind(price)
    .bind(max_group_size)
    .fetch_one(pool)
    .await?;
    Ok((id, slug))
}

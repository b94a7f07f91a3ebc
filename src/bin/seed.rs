//! Loads a small demo catalog and an admin account into the configured
//! database. Safe to run repeatedly: existing slugs and emails are skipped.

use anyhow::Context;
use bcrypt::{hash, DEFAULT_COST};
use dotenv::dotenv;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use safari_booking::config::Settings;
use safari_booking::db::Database;
use safari_booking::models::tour::ItineraryDay;
use safari_booking::utils::logging::init_logging;
use sqlx::types::Json;
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

struct SeedRoom {
    name: &'static str,
    max_occupancy: i32,
    price_per_night: Decimal,
    available_quantity: i32,
}

struct SeedAccommodation {
    slug: &'static str,
    name: &'static str,
    location: &'static str,
    destination: &'static str,
    category: &'static str,
    price_per_night: Decimal,
    rating: f64,
    amenities: &'static [&'static str],
    is_featured: bool,
    rooms: Vec<SeedRoom>,
}

struct SeedTour {
    slug: &'static str,
    title: &'static str,
    destination: &'static str,
    category: &'static str,
    price: Decimal,
    duration_days: i32,
    max_group_size: i32,
    rating: f64,
    is_featured: bool,
    itinerary: Vec<(&'static str, &'static str)>,
}

// Insert-or-fetch by slug
async fn upsert_lookup(pool: &PgPool, table: &str, slug: &str, name: &str) -> anyhow::Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(&format!(
        "INSERT INTO {table} (slug, name) VALUES ($1, $2)
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
         RETURNING id"
    ))
    .bind(slug)
    .bind(name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("seeding {} '{}'", table, slug))?;
    Ok(id)
}

async fn lookup_id(pool: &PgPool, table: &str, slug: &str) -> anyhow::Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(&format!("SELECT id FROM {table} WHERE slug = $1"))
        .bind(slug)
        .fetch_one(pool)
        .await
        .with_context(|| format!("missing {} '{}'", table, slug))
}

async fn seed_lookups(pool: &PgPool) -> anyhow::Result<()> {
    for (slug, name) in [
        ("serengeti", "Serengeti"),
        ("ngorongoro", "Ngorongoro Crater"),
        ("zanzibar", "Zanzibar"),
        ("kilimanjaro", "Mount Kilimanjaro"),
    ] {
        upsert_lookup(pool, "destinations", slug, name).await?;
    }
    for (slug, name) in [
        ("wildlife-safari", "Wildlife Safari"),
        ("trekking", "Trekking"),
        ("beach", "Beach & Island"),
    ] {
        upsert_lookup(pool, "tour_categories", slug, name).await?;
    }
    for (slug, name) in [
        ("lodge", "Lodge"),
        ("tented-camp", "Tented Camp"),
        ("hotel", "Hotel"),
    ] {
        upsert_lookup(pool, "accommodation_categories", slug, name).await?;
    }
    Ok(())
}

fn accommodations() -> Vec<SeedAccommodation> {
    vec![
        SeedAccommodation {
            slug: "serengeti-migration-camp",
            name: "Serengeti Migration Camp",
            location: "Northern Serengeti",
            destination: "serengeti",
            category: "tented-camp",
            price_per_night: dec!(420),
            rating: 4.8,
            amenities: &["wifi", "pool", "game-drives", "full-board"],
            is_featured: true,
            rooms: vec![
                SeedRoom {
                    name: "Luxury Tent",
                    max_occupancy: 2,
                    price_per_night: dec!(420),
                    available_quantity: 8,
                },
                SeedRoom {
                    name: "Family Tent",
                    max_occupancy: 4,
                    price_per_night: dec!(640),
                    available_quantity: 2,
                },
            ],
        },
        SeedAccommodation {
            slug: "crater-rim-lodge",
            name: "Crater Rim Lodge",
            location: "Ngorongoro Conservation Area",
            destination: "ngorongoro",
            category: "lodge",
            price_per_night: dec!(280),
            rating: 4.6,
            amenities: &["wifi", "restaurant", "fireplace"],
            is_featured: false,
            rooms: vec![SeedRoom {
                name: "Crater View Room",
                max_occupancy: 3,
                price_per_night: dec!(280),
                available_quantity: 12,
            }],
        },
        SeedAccommodation {
            slug: "stone-town-house",
            name: "Stone Town House",
            location: "Stone Town, Zanzibar",
            destination: "zanzibar",
            category: "hotel",
            price_per_night: dec!(95),
            rating: 4.2,
            amenities: &["wifi", "breakfast", "rooftop"],
            is_featured: false,
            rooms: vec![SeedRoom {
                name: "Double Room",
                max_occupancy: 2,
                price_per_night: dec!(95),
                available_quantity: 6,
            }],
        },
    ]
}

fn tours() -> Vec<SeedTour> {
    vec![
        SeedTour {
            slug: "great-migration-safari",
            title: "Great Migration Safari",
            destination: "serengeti",
            category: "wildlife-safari",
            price: dec!(2450),
            duration_days: 6,
            max_group_size: 8,
            rating: 4.9,
            is_featured: true,
            itinerary: vec![
                ("Arrival in Arusha", "Meet your guide and transfer to the lodge."),
                ("Into the Serengeti", "Fly north and start tracking the herds."),
                ("River crossings", "Full day at the Mara River."),
            ],
        },
        SeedTour {
            slug: "ngorongoro-day-trip",
            title: "Ngorongoro Crater Day Trip",
            destination: "ngorongoro",
            category: "wildlife-safari",
            price: dec!(180),
            duration_days: 1,
            max_group_size: 6,
            rating: 4.5,
            is_featured: false,
            itinerary: vec![("Crater floor", "Descend at dawn for a full game drive.")],
        },
        SeedTour {
            slug: "machame-route-climb",
            title: "Kilimanjaro Machame Route",
            destination: "kilimanjaro",
            category: "trekking",
            price: dec!(1890),
            duration_days: 7,
            max_group_size: 10,
            rating: 4.7,
            is_featured: true,
            itinerary: vec![
                ("Machame Gate", "Rainforest trek to Machame Camp."),
                ("Shira Plateau", "Climb out of the forest onto the moorland."),
            ],
        },
    ]
}

async fn seed_accommodations(pool: &PgPool) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for item in accommodations() {
        let destination_id = lookup_id(pool, "destinations", item.destination).await?;
        let category_id = lookup_id(pool, "accommodation_categories", item.category).await?;
        let amenities: Vec<String> = item.amenities.iter().map(|a| a.to_string()).collect();

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO accommodations (
                slug, name, location, price_per_night, rating, amenities,
                is_featured, is_verified, category_id, destination_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $9)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(item.slug)
        .bind(item.name)
        .bind(item.location)
        .bind(item.price_per_night)
        .bind(item.rating)
        .bind(&amenities)
        .bind(item.is_featured)
        .bind(category_id)
        .bind(destination_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("seeding accommodation '{}'", item.slug))?;

        let Some(id) = id else {
            continue;
        };
        for room in &item.rooms {
            sqlx::query(
                r#"
                INSERT INTO rooms (accommodation_id, name, max_occupancy, price_per_night, available_quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id)
            .bind(room.name)
            .bind(room.max_occupancy)
            .bind(room.price_per_night)
            .bind(room.available_quantity)
            .execute(pool)
            .await?;
        }
        inserted += 1;
    }
    Ok(inserted)
}

async fn seed_tours(pool: &PgPool) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for tour in tours() {
        let destination_id = lookup_id(pool, "destinations", tour.destination).await?;
        let category_id = lookup_id(pool, "tour_categories", tour.category).await?;
        let itinerary: Vec<ItineraryDay> = tour
            .itinerary
            .iter()
            .enumerate()
            .map(|(i, (title, description))| ItineraryDay {
                day: i as i32 + 1,
                title: title.to_string(),
                description: description.to_string(),
                meals: Vec::new(),
            })
            .collect();

        let result = sqlx::query(
            r#"
            INSERT INTO tours (
                slug, title, price, duration_days, max_group_size, rating,
                is_featured, itinerary, category_id, destination_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(tour.slug)
        .bind(tour.title)
        .bind(tour.price)
        .bind(tour.duration_days)
        .bind(tour.max_group_size)
        .bind(tour.rating)
        .bind(tour.is_featured)
        .bind(Json(&itinerary))
        .bind(category_id)
        .bind(destination_id)
        .execute(pool)
        .await
        .with_context(|| format!("seeding tour '{}'", tour.slug))?;

        inserted += result.rows_affected() as usize;
    }
    Ok(inserted)
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<()> {
    let email = env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@safari.local".to_string());
    let password = env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me-now".to_string());
    let password_hash = hash(password.as_bytes(), DEFAULT_COST).context("hashing admin password")?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, full_name, role)
        VALUES ($1, $2, 'Site Admin', 'admin')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(email.to_lowercase())
    .bind(password_hash)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!(%email, "admin account created");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::new().context("loading settings")?;
    init_logging(&settings.logging).context("initializing logging")?;

    let database = Database::new(&settings.database)
        .await
        .context("connecting to the database")?;
    database.migrate().await.context("running migrations")?;
    let pool = database.get_pool();

    seed_lookups(pool).await?;
    let accommodations = seed_accommodations(pool).await?;
    let tours = seed_tours(pool).await?;
    seed_admin(pool).await?;

    tracing::info!(accommodations, tours, "seed complete");
    Ok(())
}

//! Seeds the database with sample campgrounds.
//!
//! Run separately from the server whenever a fresh set of sample data is
//! needed: `cargo run --bin seed`. Wipes all campgrounds and reviews first.

use anyhow::Context;
use bcrypt::{DEFAULT_COST, hash};
use postgres::database::{create_connection_pool, run_migrations};
use rand::Rng;
use rand::seq::IndexedRandom;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const DESCRIPTORS: [&str; 12] = [
    "Forest", "Ancient", "Petrified", "Roaring", "Cascade", "Tumbling", "Silent", "Redwood",
    "Bullfrog", "Maple", "Misty", "Elk",
];

const PLACES: [&str; 10] = [
    "Flats",
    "Village",
    "Canyon",
    "Pond",
    "Group Camp",
    "Horse Camp",
    "Ghost Town",
    "Camp",
    "Dispersed Camp",
    "Backcountry",
];

// (city, state, longitude, latitude)
const CITIES: [(&str, &str, f64, f64); 20] = [
    ("Seattle", "Washington", -122.3321, 47.6062),
    ("Portland", "Oregon", -122.6765, 45.5231),
    ("Bend", "Oregon", -121.3153, 44.0582),
    ("Boise", "Idaho", -116.2023, 43.6150),
    ("Missoula", "Montana", -113.9940, 46.8721),
    ("Bozeman", "Montana", -111.0429, 45.6770),
    ("Jackson", "Wyoming", -110.7624, 43.4799),
    ("Salt Lake City", "Utah", -111.8910, 40.7608),
    ("Moab", "Utah", -109.5498, 38.5733),
    ("Denver", "Colorado", -104.9903, 39.7392),
    ("Aspen", "Colorado", -106.8175, 39.1911),
    ("Durango", "Colorado", -107.8801, 37.2753),
    ("Santa Fe", "New Mexico", -105.9378, 35.6870),
    ("Flagstaff", "Arizona", -111.6513, 35.1983),
    ("Reno", "Nevada", -119.8138, 39.5296),
    ("South Lake Tahoe", "California", -119.9772, 38.9399),
    ("Yosemite Valley", "California", -119.5936, 37.7456),
    ("Asheville", "North Carolina", -82.5515, 35.5951),
    ("Burlington", "Vermont", -73.2121, 44.4759),
    ("Bar Harbor", "Maine", -68.2039, 44.3876),
];

// Stock woodsy photos paired with the object keys the app would have stored.
const STOCK_IMAGES: [(&str, &str); 3] = [
    (
        "https://images.unsplash.com/photo-1504280390367-361c6d9f38f4",
        "seed/woodsy-1.jpg",
    ),
    (
        "https://images.unsplash.com/photo-1487730116645-74489c95b41b",
        "seed/woodsy-2.jpg",
    ),
    (
        "https://images.unsplash.com/photo-1537905569824-f89f14cceb68",
        "seed/woodsy-3.jpg",
    ),
];

const CAMPGROUND_COUNT: usize = 300;

/// Finds or creates the user that owns all seeded campgrounds.
async fn ensure_seed_user(pool: &PgPool) -> anyhow::Result<Uuid> {
    let password_hash =
        hash("campseed-password", DEFAULT_COST).context("failed to hash the seed password")?;

    let row = sqlx::query(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO UPDATE SET updated_at = NOW()
        RETURNING id
        "#,
    )
    .bind("seeds@campatlas.example")
    .bind("campseed")
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let author_id = ensure_seed_user(pool).await?;
    log::info!("🌱 Seeding as user {}", author_id);

    // Start fresh: reviews first, campgrounds second (images cascade).
    sqlx::query("DELETE FROM reviews").execute(pool).await?;
    sqlx::query("DELETE FROM campgrounds").execute(pool).await?;
    log::info!("🧹 Cleared existing campgrounds and reviews");

    let mut rng = rand::rng();

    for _ in 0..CAMPGROUND_COUNT {
        let (city, state, longitude, latitude) = *CITIES.choose(&mut rng).expect("cities");
        let descriptor = DESCRIPTORS.choose(&mut rng).expect("descriptors");
        let place = PLACES.choose(&mut rng).expect("places");
        let price: f64 = rng.random_range(10..30) as f64;

        let geometry = serde_json::json!({
            "type": "Point",
            "coordinates": [longitude, latitude]
        });

        let row = sqlx::query(
            r#"
            INSERT INTO campgrounds (title, price, description, location, geometry, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(format!("{} {}", descriptor, place))
        .bind(price)
        .bind(
            "Tucked between tall pines with easy water access, this spot fills \
             up fast on summer weekends.",
        )
        .bind(format!("{}, {}", city, state))
        .bind(&geometry)
        .bind(author_id)
        .fetch_one(pool)
        .await?;
        let campground_id: Uuid = row.get("id");

        for (position, (url, filename)) in STOCK_IMAGES.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO campground_images (campground_id, url, filename, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(campground_id)
            .bind(url)
            .bind(filename)
            .bind(position as i32)
            .execute(pool)
            .await?;
        }
    }

    log::info!("✅ Seeded {} campgrounds", CAMPGROUND_COUNT);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let pool = create_connection_pool()
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    seed(&pool).await
}

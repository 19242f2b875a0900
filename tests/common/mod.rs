#![allow(dead_code)]

use beer_cellar::domain::clock::SystemClock;
use beer_cellar::domain::rng::SeededRngSource;
use beer_cellar::state::AppState;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

/// Inventory row to seed. `beer_id` is required; everything else has a default.
pub struct EntrySeed {
    pub beer_id: i64,
    pub vintage: Option<i32>,
    pub quantity: i64,
    pub format_id: Option<i64>,
    pub special: bool,
    pub had_before: bool,
    pub date_added: Option<DateTime<Utc>>,
    pub drink_before: Option<DateTime<Utc>>,
    pub tags: Vec<&'static str>,
}

impl Default for EntrySeed {
    fn default() -> Self {
        Self {
            beer_id: 0,
            vintage: None,
            quantity: 1,
            format_id: None,
            special: false,
            had_before: false,
            date_added: None,
            drink_before: None,
            tags: Vec::new(),
        }
    }
}

impl EntrySeed {
    pub fn beer(beer_id: i64) -> Self {
        Self {
            beer_id,
            ..Default::default()
        }
    }
}

pub async fn create_cellar(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO cellars (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_brewery(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO breweries (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_style(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO beer_styles (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_beer(
    pool: &PgPool,
    brewery_id: i64,
    style_id: Option<i64>,
    name: &str,
    abv: Option<f64>,
    rating: Option<f64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO beers (brewery_id, style_id, name, abv, external_rating)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(brewery_id)
    .bind(style_id)
    .bind(name)
    .bind(abv)
    .bind(rating)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_format(pool: &PgPool, package: &str, size: f64) -> i64 {
    sqlx::query_scalar("INSERT INTO beer_formats (package, size_metric) VALUES ($1, $2) RETURNING id")
        .bind(package)
        .bind(size)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_entry(pool: &PgPool, cellar_id: i64, seed: EntrySeed) -> i64 {
    let entry_id: i64 = sqlx::query_scalar(
        "INSERT INTO cellar_entries
            (cellar_id, beer_id, vintage, quantity, format_id, special, had_before,
             date_added, drink_before)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
    )
    .bind(cellar_id)
    .bind(seed.beer_id)
    .bind(seed.vintage)
    .bind(seed.quantity)
    .bind(seed.format_id)
    .bind(seed.special)
    .bind(seed.had_before)
    .bind(seed.date_added)
    .bind(seed.drink_before)
    .fetch_one(pool)
    .await
    .unwrap();

    for tag in seed.tags {
        let tag_id: i64 = sqlx::query_scalar(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(tag)
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO cellar_entry_tags (cellar_entry_id, tag_id) VALUES ($1, $2)")
            .bind(entry_id)
            .bind(tag_id)
            .execute(pool)
            .await
            .unwrap();
    }

    entry_id
}

/// Soft-deletes an entry, as when the last bottle is drunk.
pub async fn remove_entry(pool: &PgPool, entry_id: i64) {
    sqlx::query("UPDATE cellar_entries SET deleted_at = NOW() WHERE id = $1")
        .bind(entry_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Creates a cellar holding `count` entries with ABV 5.0, 6.0, 7.0, ...
///
/// Returns the cellar id and entry ids in insertion order.
pub async fn seed_cellar(pool: &PgPool, count: usize) -> (i64, Vec<i64>) {
    let cellar_id = create_cellar(pool, "Home").await;
    let brewery_id = create_brewery(pool, "De Struise").await;
    let style_id = create_style(pool, "Imperial Stout").await;

    let mut entry_ids = Vec::with_capacity(count);
    for i in 0..count {
        let beer_id = create_beer(
            pool,
            brewery_id,
            Some(style_id),
            &format!("Beer {i}"),
            Some(5.0 + i as f64),
            Some(3.5),
        )
        .await;
        entry_ids.push(create_entry(pool, cellar_id, EntrySeed::beer(beer_id)).await);
    }

    (cellar_id, entry_ids)
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(
        Arc::new(pool),
        Arc::new(SeededRngSource::new(7)),
        Arc::new(SystemClock),
    )
}

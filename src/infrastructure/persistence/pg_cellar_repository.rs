//! PostgreSQL implementation of the cellar repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::entry_rows::{
    ENTRY_SELECT, EntryRow, fetch_entries_by_ids, push_clause, push_visibility,
};
use crate::domain::entities::{
    CellarEntry, CellarStats, EntryChanges, NamedRef, RecommendationParams,
};
use crate::domain::filter_compiler::CompiledPredicate;
use crate::domain::repositories::{CellarRepository, EntryVisibility, InventoryRepository};
use crate::error::AppError;

/// PostgreSQL repository for cellar inventory.
///
/// Compiled predicates are translated clause by clause into bound SQL
/// conditions, so every candidate query is a single round-trip.
pub struct PgCellarRepository {
    pool: Arc<PgPool>,
}

impl PgCellarRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RangesRow {
    minimum_abv: Option<f64>,
    maximum_abv: Option<f64>,
    minimum_size: Option<f64>,
    maximum_size: Option<f64>,
    minimum_vintage: Option<i32>,
    maximum_vintage: Option<i32>,
    minimum_rating: Option<f64>,
    maximum_rating: Option<f64>,
    oldest_added_date: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    beer_count: i64,
    unique_count: i64,
    total_volume: f64,
    brewery_count: i64,
    untried_count: i64,
    special_count: i64,
    average_abv: Option<f64>,
    average_rating: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    name: String,
}

impl From<NamedRow> for NamedRef {
    fn from(r: NamedRow) -> Self {
        NamedRef {
            id: r.id,
            name: r.name,
        }
    }
}

#[async_trait]
impl CellarRepository for PgCellarRepository {
    async fn fetch_candidates(
        &self,
        cellar_id: i64,
        predicate: &CompiledPredicate,
    ) -> Result<Vec<CellarEntry>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
        qb.push(" WHERE ce.cellar_id = ").push_bind(cellar_id);
        push_visibility(&mut qb, EntryVisibility::Live);
        for clause in predicate.clauses() {
            push_clause(&mut qb, clause);
        }
        qb.push(" ORDER BY ce.id");

        let rows = qb
            .build_query_as::<EntryRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(CellarEntry::from).collect())
    }

    async fn recommendation_params(
        &self,
        cellar_id: i64,
    ) -> Result<RecommendationParams, AppError> {
        let breweries = sqlx::query_as::<_, NamedRow>(
            r#"
            SELECT DISTINCT br.id, br.name
            FROM cellar_entries ce
            JOIN beers b ON b.id = ce.beer_id
            JOIN breweries br ON br.id = b.brewery_id
            WHERE ce.cellar_id = $1 AND ce.deleted_at IS NULL
            ORDER BY br.name, br.id
            "#,
        )
        .bind(cellar_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let styles = sqlx::query_as::<_, NamedRow>(
            r#"
            SELECT DISTINCT s.id, s.name
            FROM cellar_entries ce
            JOIN beers b ON b.id = ce.beer_id
            JOIN beer_styles s ON s.id = b.style_id
            WHERE ce.cellar_id = $1 AND ce.deleted_at IS NULL
            ORDER BY s.name, s.id
            "#,
        )
        .bind(cellar_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let ranges = sqlx::query_as::<_, RangesRow>(
            r#"
            SELECT
                MIN(b.abv) AS minimum_abv,
                MAX(b.abv) AS maximum_abv,
                MIN(f.size_metric) AS minimum_size,
                MAX(f.size_metric) AS maximum_size,
                MIN(ce.vintage) AS minimum_vintage,
                MAX(ce.vintage) AS maximum_vintage,
                ROUND(MIN(b.external_rating)::numeric, 2)::float8 AS minimum_rating,
                ROUND(MAX(b.external_rating)::numeric, 2)::float8 AS maximum_rating,
                MIN(ce.date_added) AS oldest_added_date
            FROM cellar_entries ce
            JOIN beers b ON b.id = ce.beer_id
            LEFT JOIN beer_formats f ON f.id = ce.format_id
            WHERE ce.cellar_id = $1 AND ce.deleted_at IS NULL
            "#,
        )
        .bind(cellar_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(RecommendationParams {
            breweries: breweries.into_iter().map(NamedRef::from).collect(),
            styles: styles.into_iter().map(NamedRef::from).collect(),
            minimum_abv: ranges.minimum_abv,
            maximum_abv: ranges.maximum_abv,
            minimum_size: ranges.minimum_size,
            maximum_size: ranges.maximum_size,
            minimum_vintage: ranges.minimum_vintage,
            maximum_vintage: ranges.maximum_vintage,
            minimum_rating: ranges.minimum_rating,
            maximum_rating: ranges.maximum_rating,
            oldest_added_date: ranges.oldest_added_date,
        })
    }
}

/// Replaces an entry's tags, creating tag names that do not exist yet.
async fn replace_tags(
    conn: &mut PgConnection,
    entry_id: i64,
    tags: &BTreeSet<String>,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM cellar_entry_tags WHERE cellar_entry_id = $1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;

    if tags.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = tags.iter().cloned().collect();

    sqlx::query("INSERT INTO tags (name) SELECT UNNEST($1::text[]) ON CONFLICT (name) DO NOTHING")
        .bind(&names)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO cellar_entry_tags (cellar_entry_id, tag_id)
        SELECT $1, id FROM tags WHERE name = ANY($2)
        "#,
    )
    .bind(entry_id)
    .bind(&names)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl InventoryRepository for PgCellarRepository {
    async fn cellar_stats(&self, cellar_id: i64) -> Result<CellarStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COALESCE(SUM(ce.quantity), 0)::BIGINT AS beer_count,
                COUNT(DISTINCT ce.beer_id) AS unique_count,
                COALESCE(SUM(f.size_metric * ce.quantity), 0)::float8 AS total_volume,
                COUNT(DISTINCT b.brewery_id) AS brewery_count,
                COUNT(*) FILTER (WHERE NOT ce.had_before) AS untried_count,
                COUNT(*) FILTER (WHERE ce.special) AS special_count,
                AVG(b.abv) AS average_abv,
                AVG(b.external_rating) AS average_rating
            FROM cellar_entries ce
            JOIN beers b ON b.id = ce.beer_id
            LEFT JOIN beer_formats f ON f.id = ce.format_id
            WHERE ce.cellar_id = $1 AND ce.deleted_at IS NULL
            "#,
        )
        .bind(cellar_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(CellarStats {
            cellar_id,
            beer_count: row.beer_count,
            unique_count: row.unique_count,
            total_volume: row.total_volume,
            brewery_count: row.brewery_count,
            untried_count: row.untried_count,
            special_count: row.special_count,
            average_abv: row.average_abv,
            average_rating: row.average_rating,
        })
    }

    async fn update_entry(
        &self,
        cellar_id: i64,
        entry_id: i64,
        changes: &EntryChanges,
    ) -> Result<Option<CellarEntry>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE cellar_entries
            SET quantity = COALESCE($3, quantity),
                vintage = COALESCE($4, vintage),
                location_id = COALESCE($5, location_id),
                format_id = COALESCE($6, format_id),
                had_before = COALESCE($7, had_before),
                special = COALESCE($8, special),
                date_added = COALESCE($9, date_added),
                drink_before = COALESCE($10, drink_before),
                cellar_until = COALESCE($11, cellar_until)
            WHERE cellar_id = $1 AND id = $2 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(cellar_id)
        .bind(entry_id)
        .bind(changes.quantity)
        .bind(changes.vintage)
        .bind(changes.location_id)
        .bind(changes.format_id)
        .bind(changes.had_before)
        .bind(changes.special)
        .bind(changes.date_added)
        .bind(changes.drink_before)
        .bind(changes.cellar_until)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entry_id) = updated else {
            return Ok(None);
        };

        if let Some(tags) = &changes.tags {
            replace_tags(&mut tx, entry_id, tags).await?;
        }

        let entry = fetch_entries_by_ids(&mut *tx, &[entry_id], EntryVisibility::Live)
            .await?
            .into_iter()
            .next();

        tx.commit().await?;

        Ok(entry)
    }

    async fn remove_entry(&self, cellar_id: i64, entry_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE cellar_entries
            SET deleted_at = NOW()
            WHERE cellar_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(cellar_id)
        .bind(entry_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

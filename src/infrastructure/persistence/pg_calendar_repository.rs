//! PostgreSQL implementation of the advent calendar repository.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;

use super::entry_rows::fetch_entries_by_ids;
use crate::domain::entities::{AdventCalendar, AdventCalendarDay, Filter, NewAdventCalendar};
use crate::domain::repositories::{CalendarRepository, EntryVisibility};
use crate::error::AppError;

const CALENDAR_SELECT: &str = r#"
    SELECT id, cellar_id, name, description, start_date, end_date,
           utc_offset_seconds, created_at
    FROM advent_calendars
"#;

/// PostgreSQL repository for advent calendars.
///
/// Dates are stored as `TIMESTAMPTZ` next to the offset the calendar was
/// created in, and are converted back to that offset when read.
pub struct PgCalendarRepository {
    pool: Arc<PgPool>,
}

impl PgCalendarRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads days and their entries for a calendar header.
    ///
    /// Fails rather than returning a calendar with a day missing.
    async fn hydrate(&self, header: CalendarRow) -> Result<AdventCalendar, AppError> {
        let offset = FixedOffset::east_opt(header.utc_offset_seconds).unwrap_or_else(|| Utc.fix());

        let day_rows = sqlx::query_as::<_, DayRow>(
            r#"
            SELECT id, day, cellar_entry_id, revealed, filter
            FROM advent_calendar_days
            WHERE advent_calendar_id = $1
            ORDER BY day
            "#,
        )
        .bind(header.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let entry_ids: Vec<i64> = day_rows.iter().map(|d| d.cellar_entry_id).collect();
        let mut entries: HashMap<i64, _> = fetch_entries_by_ids(
            self.pool.as_ref(),
            &entry_ids,
            EntryVisibility::IncludingRemoved,
        )
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

        let mut days = Vec::with_capacity(day_rows.len());
        for row in day_rows {
            let Some(entry) = entries.remove(&row.cellar_entry_id) else {
                tracing::error!(
                    calendar_id = header.id,
                    entry_id = row.cellar_entry_id,
                    "Calendar day references a missing cellar entry"
                );
                return Err(AppError::Storage(sqlx::Error::RowNotFound));
            };
            days.push(AdventCalendarDay {
                id: row.id,
                day: row.day.with_timezone(&offset),
                entry,
                revealed: row.revealed,
                filter: row.filter.0,
            });
        }

        Ok(AdventCalendar {
            id: header.id,
            cellar_id: header.cellar_id,
            name: header.name,
            description: header.description,
            start_date: header.start_date.with_timezone(&offset),
            end_date: header.end_date.with_timezone(&offset),
            days,
            created_at: header.created_at,
        })
    }

    async fn hydrate_optional(
        &self,
        header: Option<CalendarRow>,
    ) -> Result<Option<AdventCalendar>, AppError> {
        match header {
            Some(header) => Ok(Some(self.hydrate(header).await?)),
            None => Ok(None),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CalendarRow {
    id: i64,
    cellar_id: i64,
    name: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    utc_offset_seconds: i32,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DayRow {
    id: i64,
    day: DateTime<Utc>,
    cellar_entry_id: i64,
    revealed: bool,
    filter: Json<Filter>,
}

#[async_trait]
impl CalendarRepository for PgCalendarRepository {
    async fn save(&self, calendar: NewAdventCalendar) -> Result<AdventCalendar, AppError> {
        let mut tx = self.pool.begin().await?;

        let calendar_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO advent_calendars
                (cellar_id, name, description, start_date, end_date, utc_offset_seconds)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(calendar.cellar_id)
        .bind(&calendar.name)
        .bind(&calendar.description)
        .bind(calendar.start_date.with_timezone(&Utc))
        .bind(calendar.end_date.with_timezone(&Utc))
        .bind(calendar.start_date.offset().local_minus_utc())
        .fetch_one(&mut *tx)
        .await?;

        if !calendar.days.is_empty() {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO advent_calendar_days (advent_calendar_id, cellar_entry_id, day, filter) ",
            );
            qb.push_values(&calendar.days, |mut row, day| {
                row.push_bind(calendar_id)
                    .push_bind(day.cellar_entry_id)
                    .push_bind(day.day.with_timezone(&Utc))
                    .push_bind(Json(day.filter.clone()));
            });
            qb.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        self.find_by_id(calendar.cellar_id, calendar_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Advent calendar not found",
                    serde_json::json!({ "calendar_id": calendar_id }),
                )
            })
    }

    async fn find_by_id(
        &self,
        cellar_id: i64,
        calendar_id: i64,
    ) -> Result<Option<AdventCalendar>, AppError> {
        let header = sqlx::query_as::<_, CalendarRow>(&format!(
            "{CALENDAR_SELECT} WHERE cellar_id = $1 AND id = $2"
        ))
        .bind(cellar_id)
        .bind(calendar_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        self.hydrate_optional(header).await
    }

    async fn find_by_name(
        &self,
        cellar_id: i64,
        name: &str,
    ) -> Result<Option<AdventCalendar>, AppError> {
        let header = sqlx::query_as::<_, CalendarRow>(&format!(
            "{CALENDAR_SELECT} WHERE cellar_id = $1 AND name = $2"
        ))
        .bind(cellar_id)
        .bind(name)
        .fetch_optional(self.pool.as_ref())
        .await?;

        self.hydrate_optional(header).await
    }

    async fn find_for_date(
        &self,
        cellar_id: i64,
        date: DateTime<FixedOffset>,
    ) -> Result<Option<AdventCalendar>, AppError> {
        let header = sqlx::query_as::<_, CalendarRow>(&format!(
            "{CALENDAR_SELECT} WHERE cellar_id = $1 AND $2 BETWEEN start_date AND end_date \
             ORDER BY start_date, id LIMIT 1"
        ))
        .bind(cellar_id)
        .bind(date.with_timezone(&Utc))
        .fetch_optional(self.pool.as_ref())
        .await?;

        self.hydrate_optional(header).await
    }

    async fn get_day_filter(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<Option<Filter>, AppError> {
        let filter = sqlx::query_scalar::<_, Json<Filter>>(
            r#"
            SELECT d.filter
            FROM advent_calendar_days d
            JOIN advent_calendars c ON c.id = d.advent_calendar_id
            WHERE c.cellar_id = $1 AND c.id = $2 AND d.day = $3
            "#,
        )
        .bind(cellar_id)
        .bind(calendar_id)
        .bind(day.with_timezone(&Utc))
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(filter.map(|f| f.0))
    }

    async fn replace_day_entry(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
        entry_id: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE advent_calendar_days d
            SET cellar_entry_id = $4, revealed = FALSE, updated_at = NOW()
            FROM advent_calendars c
            WHERE c.id = d.advent_calendar_id
              AND c.cellar_id = $1 AND c.id = $2 AND d.day = $3
            "#,
        )
        .bind(cellar_id)
        .bind(calendar_id)
        .bind(day.with_timezone(&Utc))
        .bind(entry_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE advent_calendar_days d
            SET revealed = TRUE, updated_at = NOW()
            FROM advent_calendars c
            WHERE c.id = d.advent_calendar_id
              AND c.cellar_id = $1 AND c.id = $2 AND d.day = $3
            "#,
        )
        .bind(cellar_id)
        .bind(calendar_id)
        .bind(day.with_timezone(&Utc))
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_day_revealed(
        &self,
        cellar_id: i64,
        calendar_id: i64,
        day: DateTime<FixedOffset>,
    ) -> Result<Option<bool>, AppError> {
        let revealed = sqlx::query_scalar::<_, bool>(
            r#"
            UPDATE advent_calendar_days d
            SET revealed = NOT d.revealed, updated_at = NOW()
            FROM advent_calendars c
            WHERE c.id = d.advent_calendar_id
              AND c.cellar_id = $1 AND c.id = $2 AND d.day = $3
            RETURNING d.revealed
            "#,
        )
        .bind(cellar_id)
        .bind(calendar_id)
        .bind(day.with_timezone(&Utc))
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(revealed)
    }

    async fn delete(&self, cellar_id: i64, calendar_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM advent_calendars WHERE cellar_id = $1 AND id = $2")
            .bind(cellar_id)
            .bind(calendar_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

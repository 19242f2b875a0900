//! Shared SQL for reading cellar entries with their joined beer data.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::domain::entities::{BeerDetails, CellarEntry, ContainerFormat, StorageLocation};
use crate::domain::filter_compiler::Clause;
use crate::domain::repositories::EntryVisibility;

/// Select list and joins producing one [`EntryRow`] per cellar entry.
///
/// Callers append a `WHERE` clause.
pub(crate) const ENTRY_SELECT: &str = r#"
    SELECT
        ce.id,
        ce.cellar_id,
        ce.vintage,
        ce.quantity,
        ce.had_before,
        ce.special,
        ce.date_added,
        ce.drink_before,
        ce.cellar_until,
        ce.deleted_at,
        b.id AS beer_id,
        b.name AS beer_name,
        b.abv,
        b.external_rating,
        br.id AS brewery_id,
        br.name AS brewery_name,
        s.id AS style_id,
        s.name AS style_name,
        l.id AS location_id,
        l.name AS location_name,
        f.id AS format_id,
        f.package AS format_package,
        f.size_metric AS format_size,
        ARRAY(
            SELECT t.name
            FROM cellar_entry_tags cet
            JOIN tags t ON t.id = cet.tag_id
            WHERE cet.cellar_entry_id = ce.id
            ORDER BY t.name
        ) AS tags
    FROM cellar_entries ce
    JOIN beers b ON b.id = ce.beer_id
    JOIN breweries br ON br.id = b.brewery_id
    LEFT JOIN beer_styles s ON s.id = b.style_id
    LEFT JOIN cellar_locations l ON l.id = ce.location_id
    LEFT JOIN beer_formats f ON f.id = ce.format_id
"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EntryRow {
    id: i64,
    cellar_id: i64,
    vintage: Option<i32>,
    quantity: i64,
    had_before: bool,
    special: bool,
    date_added: Option<DateTime<Utc>>,
    drink_before: Option<DateTime<Utc>>,
    cellar_until: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    beer_id: i64,
    beer_name: String,
    abv: Option<f64>,
    external_rating: Option<f64>,
    brewery_id: i64,
    brewery_name: String,
    style_id: Option<i64>,
    style_name: Option<String>,
    location_id: Option<i64>,
    location_name: Option<String>,
    format_id: Option<i64>,
    format_package: Option<String>,
    format_size: Option<f64>,
    tags: Vec<String>,
}

impl From<EntryRow> for CellarEntry {
    fn from(r: EntryRow) -> Self {
        let location = match (r.location_id, r.location_name) {
            (Some(id), Some(name)) => Some(StorageLocation { id, name }),
            _ => None,
        };

        let format = match (r.format_id, r.format_package, r.format_size) {
            (Some(id), Some(package), Some(size_metric)) => Some(ContainerFormat {
                id,
                package,
                size_metric,
            }),
            _ => None,
        };

        CellarEntry {
            id: r.id,
            cellar_id: r.cellar_id,
            beer: BeerDetails {
                id: r.beer_id,
                name: r.beer_name,
                brewery_id: r.brewery_id,
                brewery_name: r.brewery_name,
                style_id: r.style_id,
                style_name: r.style_name,
                abv: r.abv,
                rating: r.external_rating,
            },
            vintage: r.vintage,
            quantity: r.quantity,
            location,
            format,
            had_before: r.had_before,
            special: r.special,
            date_added: r.date_added,
            drink_before: r.drink_before,
            cellar_until: r.cellar_until,
            tags: r.tags.into_iter().collect(),
            removed_at: r.deleted_at,
        }
    }
}

/// Restricts the query to live entries unless removed ones are wanted.
pub(crate) fn push_visibility(qb: &mut QueryBuilder<'_, Postgres>, visibility: EntryVisibility) {
    if visibility == EntryVisibility::Live {
        qb.push(" AND ce.deleted_at IS NULL");
    }
}

/// Appends one `AND ...` predicate for a clause.
pub(crate) fn push_clause(qb: &mut QueryBuilder<'_, Postgres>, clause: &Clause) {
    match clause {
        Clause::BreweryIs(id) => {
            qb.push(" AND b.brewery_id = ").push_bind(*id);
        }
        Clause::AbvAtLeast(v) => {
            qb.push(" AND b.abv >= ").push_bind(*v);
        }
        Clause::AbvAtMost(v) => {
            qb.push(" AND b.abv <= ").push_bind(*v);
        }
        Clause::RatingAtLeast(v) => {
            qb.push(" AND b.external_rating >= ").push_bind(*v);
        }
        Clause::RatingAtMost(v) => {
            qb.push(" AND b.external_rating <= ").push_bind(*v);
        }
        Clause::SizeAtLeast(v) => {
            qb.push(" AND f.size_metric >= ").push_bind(*v);
        }
        Clause::SizeAtMost(v) => {
            qb.push(" AND f.size_metric <= ").push_bind(*v);
        }
        Clause::StyleIs(id) => {
            qb.push(" AND b.style_id = ").push_bind(*id);
        }
        Clause::SpecialIs(flag) => {
            qb.push(" AND ce.special = ").push_bind(*flag);
        }
        Clause::HadBeforeIs(flag) => {
            qb.push(" AND ce.had_before = ").push_bind(*flag);
        }
        Clause::OverdueAt(at) => {
            qb.push(" AND ce.drink_before < ").push_bind(*at);
        }
        Clause::NotOverdueAt(at) => {
            qb.push(" AND (ce.drink_before IS NULL OR ce.drink_before >= ")
                .push_bind(*at)
                .push(")");
        }
        Clause::QuantityAtLeast(q) => {
            qb.push(" AND ce.quantity >= ").push_bind(*q);
        }
        Clause::VintageAtLeast(v) => {
            qb.push(" AND ce.vintage >= ").push_bind(*v);
        }
        Clause::VintageAtMost(v) => {
            qb.push(" AND ce.vintage <= ").push_bind(*v);
        }
        Clause::HasAllTags(tags) => {
            let names: Vec<String> = tags.iter().cloned().collect();
            let wanted = names.len() as i64;
            qb.push(
                " AND ce.id IN (
                    SELECT cet.cellar_entry_id
                    FROM cellar_entry_tags cet
                    JOIN tags t ON t.id = cet.tag_id
                    WHERE t.name = ANY(",
            )
            .push_bind(names)
            .push(
                ")
                    GROUP BY cet.cellar_entry_id
                    HAVING COUNT(DISTINCT t.name) = ",
            )
            .push_bind(wanted)
            .push(")");
        }
        Clause::AddedBefore(at) => {
            qb.push(" AND ce.date_added < ").push_bind(*at);
        }
    }
}

/// Loads entries by id, ordered by id.
pub(crate) async fn fetch_entries_by_ids<'e, E: PgExecutor<'e>>(
    executor: E,
    ids: &[i64],
    visibility: EntryVisibility,
) -> Result<Vec<CellarEntry>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Postgres>::new(ENTRY_SELECT);
    qb.push(" WHERE ce.id = ANY(").push_bind(ids.to_vec()).push(")");
    push_visibility(&mut qb, visibility);
    qb.push(" ORDER BY ce.id");

    let rows = qb.build_query_as::<EntryRow>().fetch_all(executor).await?;

    Ok(rows.into_iter().map(CellarEntry::from).collect())
}

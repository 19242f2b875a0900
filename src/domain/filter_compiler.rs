//! Compilation of sparse [`Filter`]s into immutable clause lists.
//!
//! The compiler is pure: it never touches storage and never reads the system
//! clock. Time-relative criteria resolve against the `now` the caller passes in.
//! Storage implementations translate each [`Clause`] into one query predicate;
//! [`CompiledPredicate::matches`] evaluates the same semantics in memory.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::domain::entities::{CellarEntry, Filter};

/// One constraint over a cellar entry.
///
/// Comparisons against an attribute the entry does not have (no ABV, no
/// vintage, no container format, no date added) never match.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    BreweryIs(i64),
    AbvAtLeast(f64),
    AbvAtMost(f64),
    RatingAtLeast(f64),
    RatingAtMost(f64),
    SizeAtLeast(f64),
    SizeAtMost(f64),
    StyleIs(i64),
    SpecialIs(bool),
    HadBeforeIs(bool),
    /// `drink_before < at`
    OverdueAt(DateTime<Utc>),
    /// `drink_before` unset or `drink_before >= at`
    NotOverdueAt(DateTime<Utc>),
    QuantityAtLeast(i64),
    VintageAtLeast(i32),
    VintageAtMost(i32),
    /// Entry tags must be a superset of these.
    HasAllTags(BTreeSet<String>),
    /// `date_added < at`
    AddedBefore(DateTime<Utc>),
}

impl Clause {
    /// Evaluates the clause against an entry.
    pub fn matches(&self, entry: &CellarEntry) -> bool {
        let size = entry.format.as_ref().map(|f| f.size_metric);

        match self {
            Clause::BreweryIs(id) => entry.beer.brewery_id == *id,
            Clause::AbvAtLeast(v) => entry.beer.abv.is_some_and(|abv| abv >= *v),
            Clause::AbvAtMost(v) => entry.beer.abv.is_some_and(|abv| abv <= *v),
            Clause::RatingAtLeast(v) => entry.beer.rating.is_some_and(|r| r >= *v),
            Clause::RatingAtMost(v) => entry.beer.rating.is_some_and(|r| r <= *v),
            Clause::SizeAtLeast(v) => size.is_some_and(|s| s >= *v),
            Clause::SizeAtMost(v) => size.is_some_and(|s| s <= *v),
            Clause::StyleIs(id) => entry.beer.style_id == Some(*id),
            Clause::SpecialIs(b) => entry.special == *b,
            Clause::HadBeforeIs(b) => entry.had_before == *b,
            Clause::OverdueAt(at) => entry.is_overdue(*at),
            Clause::NotOverdueAt(at) => !entry.is_overdue(*at),
            Clause::QuantityAtLeast(q) => entry.quantity >= *q,
            Clause::VintageAtLeast(v) => entry.vintage.is_some_and(|y| y >= *v),
            Clause::VintageAtMost(v) => entry.vintage.is_some_and(|y| y <= *v),
            Clause::HasAllTags(tags) => entry.has_all_tags(tags),
            Clause::AddedBefore(at) => entry.date_added.is_some_and(|d| d < *at),
        }
    }
}

/// Read-only conjunction of clauses produced by [`compile`].
///
/// An empty predicate matches every live entry of the cellar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledPredicate {
    clauses: Vec<Clause>,
}

impl CompiledPredicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if every clause matches the entry.
    pub fn matches(&self, entry: &CellarEntry) -> bool {
        self.clauses.iter().all(|c| c.matches(entry))
    }
}

/// Compiles a filter into one clause per set field.
///
/// Unset fields produce no clause. `overdue_to_drink: Some(true)` selects
/// entries whose drink-before date has passed at `now`; `Some(false)` selects
/// entries that are not overdue.
pub fn compile(filter: &Filter, now: DateTime<Utc>) -> CompiledPredicate {
    let mut clauses = Vec::new();

    if let Some(id) = filter.brewery_id {
        clauses.push(Clause::BreweryIs(id));
    }
    if let Some(v) = filter.minimum_abv {
        clauses.push(Clause::AbvAtLeast(v));
    }
    if let Some(v) = filter.maximum_abv {
        clauses.push(Clause::AbvAtMost(v));
    }
    if let Some(v) = filter.minimum_rating {
        clauses.push(Clause::RatingAtLeast(v));
    }
    if let Some(v) = filter.maximum_rating {
        clauses.push(Clause::RatingAtMost(v));
    }
    if let Some(v) = filter.minimum_size {
        clauses.push(Clause::SizeAtLeast(v));
    }
    if let Some(v) = filter.maximum_size {
        clauses.push(Clause::SizeAtMost(v));
    }
    if let Some(id) = filter.style_id {
        clauses.push(Clause::StyleIs(id));
    }
    if let Some(b) = filter.special {
        clauses.push(Clause::SpecialIs(b));
    }
    if let Some(b) = filter.had_before {
        clauses.push(Clause::HadBeforeIs(b));
    }
    if let Some(overdue) = filter.overdue_to_drink {
        clauses.push(if overdue {
            Clause::OverdueAt(now)
        } else {
            Clause::NotOverdueAt(now)
        });
    }
    if let Some(q) = filter.minimum_quantity {
        clauses.push(Clause::QuantityAtLeast(q));
    }
    if let Some(v) = filter.minimum_vintage {
        clauses.push(Clause::VintageAtLeast(v));
    }
    if let Some(v) = filter.maximum_vintage {
        clauses.push(Clause::VintageAtMost(v));
    }
    if !filter.tags.is_empty() {
        clauses.push(Clause::HasAllTags(filter.tags.clone()));
    }
    if let Some(at) = filter.added_before {
        clauses.push(Clause::AddedBefore(at));
    }

    CompiledPredicate { clauses }
}

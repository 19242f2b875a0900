//! Random selection of a recommendation from a candidate list.
//!
//! Selection is two explicit steps: shuffle the candidate indices with the
//! caller's RNG, then scan for the first candidate that is not excluded. The
//! shuffle is a uniform permutation, so the first eligible index in it is
//! uniform over the eligible subset whatever the input order.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

use crate::domain::entities::CellarEntry;

/// Why no entry could be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no candidates matched the filter")]
    NoCandidates,
    #[error("every matching candidate is already assigned")]
    NoUniqueCandidate,
}

/// Picks one candidate whose id is not in `excluded`, uniformly at random.
///
/// # Errors
///
/// - [`SelectionError::NoCandidates`] if `candidates` is empty
/// - [`SelectionError::NoUniqueCandidate`] if every candidate is excluded
pub fn select<'a, R: Rng + ?Sized>(
    candidates: &'a [CellarEntry],
    excluded: &HashSet<i64>,
    rng: &mut R,
) -> Result<&'a CellarEntry, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|i| &candidates[i])
        .find(|c| !excluded.contains(&c.id))
        .ok_or(SelectionError::NoUniqueCandidate)
}

/// Picks any candidate uniformly at random, or `None` if there are none.
pub fn pick_any<'a, R: Rng + ?Sized>(
    candidates: &'a [CellarEntry],
    rng: &mut R,
) -> Option<&'a CellarEntry> {
    candidates.choose(rng)
}

// piiredact/src/resolver.rs
//! Overlap resolution: reduces the candidate multiset from a catalog scan
//! into the non-overlapping, position-ordered set of winners.
//!
//! The policy is greedy first-fit, not maximum-coverage interval scheduling:
//! earlier-starting candidates win, and at equal starts the earlier-declared
//! detector wins. Consumers depend on this precedence when two detector
//! families compete for the same digits (e.g. a national-ID pattern vs. a
//! bank-account digit run), so it must not be replaced with longest-match
//! or most-specific-type selection.

use crate::analysis::Candidate;

/// Returns true if the two half-open spans strictly intersect.
/// Touching spans (`a.end == b.start`) do not overlap.
fn overlaps(a: &Candidate, b: &Candidate) -> bool {
    !(a.end <= b.start || a.start >= b.end)
}

/// Resolves an unordered candidate multiset into non-overlapping winners,
/// sorted ascending by start.
///
/// Candidates are stably sorted by start, preserving catalog-declaration
/// order as the tie-break for equal starts, then accepted first-fit:
/// a candidate is discarded iff it overlaps an already-accepted winner.
///
/// Accepted winners are non-overlapping and start-sorted, so their end
/// offsets are monotonic; checking the most recently accepted winner is
/// equivalent to checking them all.
pub fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.start);

    let mut winners: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match winners.last() {
            Some(last) if overlaps(last, &candidate) => {
                log::debug!(
                    "[piiredact::resolver] Discarding '{}' at {}..{}: overlaps accepted '{}' at {}..{}",
                    candidate.rule_name,
                    candidate.start,
                    candidate.end,
                    last.rule_name,
                    last.start,
                    last.end
                );
            }
            _ => winners.push(candidate),
        }
    }
    winners
}

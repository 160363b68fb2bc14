//! Identifier allocation for bookmark nodes.
//!
//! Fresh ids are random v4 UUIDs (122 random bits from the OS CSPRNG). Every
//! candidate is still checked against the ids already in use, with a bounded
//! number of retries so allocation always terminates.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::types::bookmark::BookmarkItem;
use crate::types::errors::BookmarkError;

/// Default retry bound used when no setting overrides it.
pub const DEFAULT_MAX_ATTEMPTS: usize = 16;

/// Returns true if `id` is used by any node anywhere in `items`.
pub fn is_id_taken(items: &[Arc<BookmarkItem>], id: &str) -> bool {
    items
        .iter()
        .any(|item| item.id() == id || is_id_taken(item.children(), id))
}

/// Adds every id present in `items` (recursively) to `ids`.
pub fn collect_ids(items: &[Arc<BookmarkItem>], ids: &mut HashSet<String>) {
    for item in items {
        ids.insert(item.id().to_string());
        collect_ids(item.children(), ids);
    }
}

/// Allocates an id not used anywhere in `tree`.
pub fn allocate(tree: &[Arc<BookmarkItem>]) -> Result<String, BookmarkError> {
    allocate_with_attempts(tree, DEFAULT_MAX_ATTEMPTS)
}

/// Allocates an id not used anywhere in `tree`, trying at most `max_attempts` candidates.
pub fn allocate_with_attempts(
    tree: &[Arc<BookmarkItem>],
    max_attempts: usize,
) -> Result<String, BookmarkError> {
    allocate_from(random_id, |candidate| is_id_taken(tree, candidate), max_attempts)
}

/// Allocates an id that is not in `taken`.
pub fn allocate_excluding(
    taken: &HashSet<String>,
    max_attempts: usize,
) -> Result<String, BookmarkError> {
    allocate_from(random_id, |candidate| taken.contains(candidate), max_attempts)
}

/// Core retry loop: draws candidates from `generate` until one is not taken.
///
/// At least one candidate is always drawn, even if `max_attempts` is zero.
pub fn allocate_from<G, T>(
    mut generate: G,
    is_taken: T,
    max_attempts: usize,
) -> Result<String, BookmarkError>
where
    G: FnMut() -> String,
    T: Fn(&str) -> bool,
{
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        let candidate = generate();
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
        log::debug!("id collision on attempt {}: {}", attempt, candidate);
    }
    Err(BookmarkError::IdExhausted(attempts))
}

fn random_id() -> String {
    Uuid::new_v4().to_string()
}

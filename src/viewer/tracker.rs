// tracker.rs: Session-scoped record of which authors have been opened.

use std::collections::HashSet;

/// Tracks seen authors for the current session only; persisting seen state
/// to a backend belongs to whoever consumes the `AuthorSeen` event.
#[derive(Debug, Default)]
pub struct SeenTracker {
    seen: HashSet<String>,
}

impl SeenTracker {
    /// Mark an author as seen. Idempotent; returns true only the first time
    /// so callers can emit the outward event at most once per author.
    pub fn mark_seen(&mut self, author_id: &str) -> bool {
        self.seen.insert(author_id.to_string())
    }
}

//! Navigation and history engine
//!
//! Tracks the images actually shown this session plus a cursor for
//! back/forward replay. Browser-style semantics: going back and then
//! advancing to something new discards the forward entries.

use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Per-session navigation state over a fixed candidate pool
#[derive(Debug, Clone)]
pub struct NavigationSession {
    /// Ordered (or shuffled) candidates for this session
    pool: Vec<PathBuf>,
    /// Random draws vs sequential traversal of the pool
    random: bool,
    /// Images actually shown, in viewing order
    history: Vec<PathBuf>,
    /// Index into `history`; None until something is shown
    cursor: Option<usize>,
    /// Next pool slot, sequential mode only
    sequential_pointer: usize,
}

impl NavigationSession {
    pub fn new(pool: Vec<PathBuf>, random: bool) -> Self {
        Self {
            pool,
            random,
            history: Vec::new(),
            cursor: None,
            sequential_pointer: 0,
        }
    }

    /// A session with nothing to show
    pub fn empty() -> Self {
        Self::new(Vec::new(), true)
    }

    /// Replace the candidate pool and forget the session so far.
    /// Called whenever the active folder or collection changes.
    pub fn reset(&mut self, pool: Vec<PathBuf>, random: bool) {
        self.pool = pool;
        self.random = random;
        self.history.clear();
        self.cursor = None;
        self.sequential_pointer = 0;
    }

    /// Show a new image: the next sequential candidate, or a random draw
    /// from the pool minus everything already in history.
    ///
    /// Returns None on an empty pool, leaving all state untouched.
    pub fn advance(&mut self) -> Option<&Path> {
        if self.pool.is_empty() {
            return None;
        }

        let next = if self.random {
            self.draw_random()
        } else {
            self.draw_sequential()
        };
        self.record(next);
        self.current()
    }

    /// Step back in history. No-op at the start or before anything shown.
    /// Never mutates the history itself.
    pub fn previous(&mut self) -> Option<&Path> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.current()
    }

    /// Replay forward history when the cursor is behind the tip, otherwise
    /// advance to a new image.
    pub fn next(&mut self) -> Option<&Path> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.history.len() => {
                self.cursor = Some(cursor + 1);
                self.current()
            }
            _ => self.advance(),
        }
    }

    /// Jump the cursor to an entry already in history (first occurrence).
    /// Returns None when the path was never shown; a miss is a caller
    /// error and deliberately does not fall back to a new draw.
    pub fn jump_to(&mut self, path: &Path) -> Option<&Path> {
        let index = self.history.iter().position(|p| p == path)?;
        self.cursor = Some(index);
        self.current()
    }

    /// The image under the cursor
    pub fn current(&self) -> Option<&Path> {
        self.cursor
            .and_then(|i| self.history.get(i))
            .map(|p| p.as_path())
    }

    pub fn history(&self) -> &[PathBuf] {
        &self.history
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_random(&self) -> bool {
        self.random
    }

    fn draw_sequential(&mut self) -> PathBuf {
        if self.sequential_pointer >= self.pool.len() {
            self.sequential_pointer = 0;
        }
        let path = self.pool[self.sequential_pointer].clone();
        self.sequential_pointer += 1;
        path
    }

    fn draw_random(&mut self) -> PathBuf {
        let shown: HashSet<&PathBuf> = self.history.iter().collect();
        let mut candidates: Vec<&PathBuf> =
            self.pool.iter().filter(|p| !shown.contains(p)).collect();

        if candidates.is_empty() {
            // Every candidate has been shown: the pool cycles. Clear the
            // history and make everything eligible again, keeping only the
            // image still on screen out of the first draw.
            let last = self.history.last().cloned();
            self.history.clear();
            self.cursor = None;
            candidates = self
                .pool
                .iter()
                .filter(|p| self.pool.len() == 1 || Some(*p) != last.as_ref())
                .collect();
        }

        // Non-empty here: the pool is non-empty and at most one entry was
        // filtered from a pool of two or more
        candidates
            .choose(&mut rand::rng())
            .map(|p| (*p).clone())
            .unwrap_or_else(|| self.pool[0].clone())
    }

    /// Truncate-then-append: discard forward entries, then record the new
    /// image unless it would duplicate the one already at the tip.
    fn record(&mut self, path: PathBuf) {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.history.len() {
                self.history.truncate(cursor + 1);
            }
        }

        if self.history.last() != Some(&path) {
            self.history.push(path);
        }
        self.cursor = Some(self.history.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_empty_pool_is_a_no_op() {
        let mut session = NavigationSession::empty();
        assert!(session.advance().is_none());
        assert!(session.next().is_none());
        assert!(session.previous().is_none());
        assert!(session.current().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_sequential_traversal_wraps() {
        let mut session = NavigationSession::new(pool(&["a", "b"]), false);

        assert_eq!(session.advance().unwrap(), Path::new("a"));
        assert_eq!(session.advance().unwrap(), Path::new("b"));
        assert_eq!(session.advance().unwrap(), Path::new("a"));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_previous_walks_back_without_mutating() {
        let mut session = NavigationSession::new(pool(&["a", "b", "c"]), false);
        session.advance();
        session.advance();
        session.advance();

        assert_eq!(session.previous().unwrap(), Path::new("b"));
        assert_eq!(session.previous().unwrap(), Path::new("a"));
        // At the start: no-op
        assert!(session.previous().is_none());
        assert_eq!(session.current().unwrap(), Path::new("a"));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_next_replays_forward_history() {
        let mut session = NavigationSession::new(pool(&["a", "b", "c"]), false);
        session.advance();
        session.advance();
        session.advance();
        session.previous();
        session.previous();

        // Replay, not a new draw: history stays intact
        assert_eq!(session.next().unwrap(), Path::new("b"));
        assert_eq!(session.next().unwrap(), Path::new("c"));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_branching_discards_forward_history() {
        let mut session = NavigationSession::new(pool(&["a", "b", "c", "d", "e"]), false);
        for _ in 0..4 {
            session.advance();
        }
        // history = [a, b, c, d]; walk back to b
        session.previous();
        session.previous();
        assert_eq!(session.cursor(), Some(1));

        // A new draw (pool slot 4 = "e") branches: c and d are discarded
        assert_eq!(session.advance().unwrap(), Path::new("e"));
        assert_eq!(session.history(), pool(&["a", "b", "e"]).as_slice());
        assert_eq!(session.cursor(), Some(2));
    }

    #[test]
    fn test_random_draws_avoid_history_until_exhausted() {
        let mut session = NavigationSession::new(pool(&["a", "b", "c"]), true);

        let mut seen = HashSet::new();
        for _ in 0..3 {
            seen.insert(session.advance().unwrap().to_path_buf());
        }
        // Three draws with no repeats cover the whole pool
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_random_pool_exhaustion_cycles() {
        let mut session = NavigationSession::new(pool(&["a", "b"]), true);
        session.advance();
        session.advance();
        assert_eq!(session.history().len(), 2);

        // The pool is exhausted; the next draw must still succeed
        let third = session.advance();
        assert!(third.is_some());
        // History restarted rather than growing without bound
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_no_consecutive_duplicates_across_refills() {
        let mut session = NavigationSession::new(pool(&["a", "b"]), true);

        let mut displayed = Vec::new();
        for _ in 0..40 {
            displayed.push(session.advance().unwrap().to_path_buf());
        }
        for pair in displayed.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_single_image_pool_may_repeat() {
        let mut session = NavigationSession::new(pool(&["only"]), true);

        assert_eq!(session.advance().unwrap(), Path::new("only"));
        assert_eq!(session.advance().unwrap(), Path::new("only"));
        // The duplicate is suppressed in history, not in display
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_jump_to_history_entry() {
        let mut session = NavigationSession::new(pool(&["a", "b", "c"]), false);
        session.advance();
        session.advance();
        session.advance();

        assert_eq!(session.jump_to(Path::new("a")).unwrap(), Path::new("a"));
        assert_eq!(session.cursor(), Some(0));

        // Unknown path: not found, cursor untouched
        assert!(session.jump_to(Path::new("zzz")).is_none());
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn test_reset_replaces_pool_and_clears_state() {
        let mut session = NavigationSession::new(pool(&["a", "b"]), false);
        session.advance();
        session.advance();

        session.reset(pool(&["x"]), true);
        assert!(session.history().is_empty());
        assert!(session.current().is_none());
        assert_eq!(session.pool_len(), 1);
        assert_eq!(session.advance().unwrap(), Path::new("x"));
    }
}

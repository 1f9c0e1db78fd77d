//! Generation tokens for discarding stale asynchronous results

use serde::{Deserialize, Serialize};

/// Identifies one selection; later selections carry larger values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionGeneration(u64);

impl SelectionGeneration {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Records the current generation and whether the widget has been torn down
///
/// A result tagged with generation `g` may be applied only while `g` is still
/// current and teardown has not begun. Teardown is terminal: no generation is
/// ever current again.
#[derive(Debug, Default)]
pub struct SyncGuard {
    current: u64,
    terminated: bool,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier one
    pub fn advance(&mut self) -> SelectionGeneration {
        self.current += 1;
        SelectionGeneration(self.current)
    }

    pub fn current(&self) -> SelectionGeneration {
        SelectionGeneration(self.current)
    }

    /// Whether a result started under `generation` may still be applied
    pub fn is_current(&self, generation: SelectionGeneration) -> bool {
        !self.terminated && generation.0 == self.current
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_supersedes() {
        let mut guard = SyncGuard::new();
        let first = guard.advance();
        assert!(guard.is_current(first));

        let second = guard.advance();
        assert!(second > first);
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert_eq!(guard.current(), second);
    }

    #[test]
    fn test_terminate_rejects_everything() {
        let mut guard = SyncGuard::new();
        let generation = guard.advance();

        guard.terminate();
        assert!(guard.is_terminated());
        assert!(!guard.is_current(generation));
        assert!(!guard.is_current(guard.current()));
    }
}

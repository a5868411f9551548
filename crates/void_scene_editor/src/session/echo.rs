//! Suppression of change notifications caused by programmatic field updates.
//!
//! When the session writes an entity's values into the inspector fields,
//! the UI toolkit may report those writes as user edits. The session holds
//! an [`EchoGuard`] for the duration of the write and drops any commit that
//! arrives while one is alive.

use std::cell::Cell;
use std::rc::Rc;

/// Shared suppression counter. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct EchoGate {
    depth: Rc<Cell<u32>>,
}

impl EchoGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress commits until the returned guard is dropped. Guards nest.
    pub fn suppress(&self) -> EchoGuard {
        self.depth.set(self.depth.get() + 1);
        EchoGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Keeps its [`EchoGate`] closed while alive, including during unwinding.
#[must_use = "suppression ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct EchoGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for EchoGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

//! Model readiness signal.

use std::sync::atomic::{AtomicBool, Ordering};

/// One-way not-ready to ready flag.
///
/// The writer publishes with `Release` and readers observe with `Acquire`,
/// so everything written before [`ReadinessGate::signal_ready`] is visible
/// to any reader that sees `true`.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    ready: AtomicBool,
}

impl ReadinessGate {
    /// Create a gate in the not-ready state.
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    /// Mark the gate ready. Repeated calls have no further effect.
    pub fn signal_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether the gate has been signalled. Never blocks.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

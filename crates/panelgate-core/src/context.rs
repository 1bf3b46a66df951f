//! Per-call execution context.
//!
//! Every public client operation accepts a [`CallContext`] carrying an
//! optional deadline. The library bakes in no default timeout — a caller
//! that needs one must set it here, per call.

use std::time::{Duration, Instant};

/// Deadline for a single panel call.
///
/// `CallContext::default()` is unbounded. The transports enforce the
/// deadline around their blocking section (subprocess wait or HTTP round
/// trip) and surface expiry as [`PanelError::Cancelled`](crate::PanelError).
///
/// Cheap to copy; carries no per-call mutable state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// An unbounded context: the call runs until it completes or fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// A context with an absolute deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Time left before expiry, or `None` when unbounded.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has already passed.
    ///
    /// Transports check this before starting any I/O so an expired context
    /// never produces an observable request.
    pub fn is_expired(&self) -> bool {
        self.remaining() == Some(Duration::ZERO)
    }
}

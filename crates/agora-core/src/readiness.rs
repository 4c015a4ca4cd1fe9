//! Goal-pursuit readiness: whether the agent may start pursuing its goals.
//!
//! The flag starts at [`ReadinessStatus::NotReady`] and moves to
//! [`ReadinessStatus::Ready`] once, after the first successful
//! initialization. It never reverts.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// The two readiness states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadinessStatus {
    /// Holdings and preferences are not yet known.
    NotReady,
    /// The agent has been initialized.
    Ready,
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => f.write_str("not_ready"),
            Self::Ready => f.write_str("ready"),
        }
    }
}

/// A one-way readiness flag, readable from any thread.
#[derive(Debug, Default)]
pub struct GoalPursuitReadiness {
    ready: AtomicBool,
}

impl GoalPursuitReadiness {
    /// A flag in the not-ready state.
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    /// The current status.
    pub fn status(&self) -> ReadinessStatus {
        if self.is_ready() {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        }
    }

    /// Whether the agent is ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Move to ready. Returns `true` on the first call only.
    pub(crate) fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_ready_and_transitions_once() {
        let readiness = GoalPursuitReadiness::new();
        assert_eq!(readiness.status(), ReadinessStatus::NotReady);
        assert!(readiness.mark_ready());
        assert!(!readiness.mark_ready());
        assert_eq!(readiness.status(), ReadinessStatus::Ready);
        assert_eq!(readiness.status().to_string(), "ready");
    }
}

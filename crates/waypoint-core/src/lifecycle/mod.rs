//! Lifecycle state machine for task and plan statuses.
//!
//! The transition tables are pure and storage-free. Each status enum
//! implements [`Lifecycle`] with an exhaustive `match`, so adding a status
//! without deciding its outgoing transitions fails to compile.
//!
//! ```rust
//! use waypoint_core::{lifecycle::Lifecycle, models::TaskStatus};
//!
//! assert!(TaskStatus::Ready.can_transition(TaskStatus::InProgress));
//! assert!(!TaskStatus::Ready.can_transition(TaskStatus::Ready));
//! assert_eq!(
//!     TaskStatus::Backlog
//!         .transition(TaskStatus::Completed)
//!         .unwrap_err()
//!         .to_string(),
//!     "Invalid transition from backlog to completed"
//! );
//! ```

use std::fmt;

use thiserror::Error;

mod plan;
mod task;

/// A closed set of states with a fixed transition table.
pub trait Lifecycle: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Allowed next states, in table order. Terminal states return `&[]`.
    fn allowed_transitions(self) -> &'static [Self];

    /// Short audit verb for a valid transition, `None` otherwise.
    fn trigger_name(self, to: Self) -> Option<&'static str>;

    /// Whether `to` may follow `self`. Self-transitions are always refused.
    fn can_transition(self, to: Self) -> bool {
        self != to && self.allowed_transitions().contains(&to)
    }

    /// Whether no transition leaves this state.
    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Validates a transition, returning the new state on success.
    fn transition(self, to: Self) -> Result<Self, InvalidTransition<Self>> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

/// A transition the table refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid transition from {from} to {to}")]
pub struct InvalidTransition<S: fmt::Display + fmt::Debug> {
    pub from: S,
    pub to: S,
}

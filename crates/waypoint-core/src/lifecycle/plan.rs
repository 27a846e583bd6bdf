//! Plan status transition table.

use super::Lifecycle;
use crate::models::PlanStatus;

impl Lifecycle for PlanStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        use PlanStatus::*;

        match self {
            Draft => &[Active],
            Active => &[Completed, Archived],
            Completed => &[Archived],
            Archived => &[],
        }
    }

    fn trigger_name(self, to: Self) -> Option<&'static str> {
        use PlanStatus::*;

        if !self.can_transition(to) {
            return None;
        }
        match (self, to) {
            (Draft, Active) => Some("activate"),
            (Active, Completed) => Some("complete"),
            (Active | Completed, Archived) => Some("archive"),
            _ => None,
        }
    }
}

//! Task status transition table.

use super::Lifecycle;
use crate::models::TaskStatus;

impl Lifecycle for TaskStatus {
    fn allowed_transitions(self) -> &'static [Self] {
        use TaskStatus::*;

        match self {
            Backlog => &[Ready, Cancelled],
            Ready => &[InProgress, Cancelled],
            InProgress => &[Review, Blocked, Cancelled],
            Review => &[Completed, InProgress, Cancelled],
            Blocked => &[InProgress, Ready, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    fn trigger_name(self, to: Self) -> Option<&'static str> {
        use TaskStatus::*;

        if !self.can_transition(to) {
            return None;
        }
        match (self, to) {
            (_, Cancelled) => Some("cancel"),
            (Backlog, Ready) => Some("plan"),
            (Ready, InProgress) => Some("start"),
            (InProgress, Review) => Some("submit"),
            (InProgress, Blocked) => Some("block"),
            (Review, Completed) => Some("approve"),
            (Review, InProgress) => Some("reject"),
            (Blocked, InProgress) => Some("unblock"),
            (Blocked, Ready) => Some("reset"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TaskStatus; 7] = [
        TaskStatus::Backlog,
        TaskStatus::Ready,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Blocked,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    #[test]
    fn test_self_transition_is_never_allowed() {
        for status in ALL {
            assert!(!status.can_transition(status), "{status} -> {status}");
            assert!(status.transition(status).is_err());
        }
    }

    #[test]
    fn test_terminal_states_have_no_transitions() {
        assert!(TaskStatus::Completed.allowed_transitions().is_empty());
        assert!(TaskStatus::Cancelled.allowed_transitions().is_empty());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!TaskStatus::Blocked.is_terminal());
    }

    #[test]
    fn test_table_order_is_deterministic() {
        assert_eq!(
            TaskStatus::Blocked.allowed_transitions(),
            &[TaskStatus::InProgress, TaskStatus::Ready, TaskStatus::Cancelled]
        );
        assert_eq!(
            TaskStatus::Review.allowed_transitions(),
            &[TaskStatus::Completed, TaskStatus::InProgress, TaskStatus::Cancelled]
        );
    }

    #[test]
    fn test_transition_results() {
        assert_eq!(
            TaskStatus::Blocked.transition(TaskStatus::InProgress),
            Ok(TaskStatus::InProgress)
        );

        let err = TaskStatus::Backlog
            .transition(TaskStatus::Completed)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("backlog"));
        assert!(message.contains("completed"));
    }

    #[test]
    fn test_every_non_terminal_state_can_be_cancelled() {
        for status in ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition(TaskStatus::Cancelled));
            assert_eq!(status.trigger_name(TaskStatus::Cancelled), Some("cancel"));
        }
    }

    #[test]
    fn test_every_table_entry_has_a_trigger() {
        for from in ALL {
            for &to in from.allowed_transitions() {
                assert!(
                    from.trigger_name(to).is_some(),
                    "missing trigger for {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_known_trigger_names() {
        assert_eq!(
            TaskStatus::Ready.trigger_name(TaskStatus::InProgress),
            Some("start")
        );
        assert_eq!(
            TaskStatus::Review.trigger_name(TaskStatus::Completed),
            Some("approve")
        );
        assert_eq!(
            TaskStatus::Backlog.trigger_name(TaskStatus::Completed),
            None
        );
    }
}

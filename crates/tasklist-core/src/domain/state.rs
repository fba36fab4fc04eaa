//! Completion state machine.

use serde::{Deserialize, Serialize};

use super::{TaskError, TaskId};

/// Completion state of a task (derived, never stored).
///
/// State transitions:
/// - NotDone -> Done    (mark_done)
/// - Done    -> NotDone (unmark_done)
///
/// Repeating a transition is rejected:
/// - Done    -- mark_done   --> AlreadyDone
/// - NotDone -- unmark_done --> NotDone
///
/// No terminal state. A new task starts as NotDone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    #[default]
    NotDone,
    Done,
}

impl CompletionState {
    /// Marker presence is the state.
    pub fn from_marker(present: bool) -> Self {
        if present {
            CompletionState::Done
        } else {
            CompletionState::NotDone
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, CompletionState::Done)
    }

    /// NotDone -> Done.
    pub fn mark_done(self, task_id: TaskId) -> Result<Self, TaskError> {
        match self {
            CompletionState::NotDone => Ok(CompletionState::Done),
            CompletionState::Done => Err(TaskError::AlreadyDone(task_id)),
        }
    }

    /// Done -> NotDone.
    pub fn unmark_done(self, task_id: TaskId) -> Result<Self, TaskError> {
        match self {
            CompletionState::Done => Ok(CompletionState::NotDone),
            CompletionState::NotDone => Err(TaskError::NotDone(task_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_task_starts_not_done() {
        assert_eq!(CompletionState::default(), CompletionState::NotDone);
        assert_eq!(CompletionState::from_marker(false), CompletionState::NotDone);
        assert_eq!(CompletionState::from_marker(true), CompletionState::Done);
    }

    #[test]
    fn mark_then_unmark_round_trips() {
        let id = TaskId::new(1);
        let state = CompletionState::NotDone.mark_done(id).unwrap();
        assert!(state.is_done());

        let state = state.unmark_done(id).unwrap();
        assert_eq!(state, CompletionState::NotDone);
    }

    #[rstest]
    #[case::mark_twice(CompletionState::Done, true)]
    #[case::unmark_never_marked(CompletionState::NotDone, false)]
    fn repeated_transition_is_rejected(#[case] state: CompletionState, #[case] marking: bool) {
        let id = TaskId::new(9);
        let result = if marking {
            state.mark_done(id)
        } else {
            state.unmark_done(id)
        };

        match result {
            Err(TaskError::AlreadyDone(got)) => {
                assert!(marking);
                assert_eq!(got, id);
            }
            Err(TaskError::NotDone(got)) => {
                assert!(!marking);
                assert_eq!(got, id);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}

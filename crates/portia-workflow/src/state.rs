//! Rename workflow state machine
//!
//! `Idle → Validating → Applying → AwaitingConfirmation → {Committed | RolledBack}`
//!
//! Validation and identity checks fall back to `Idle` without sending a
//! request. `Committed` and `RolledBack` are terminal.

/// Phases of one rename invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenameState {
    Idle,
    Validating,
    /// Name is applied locally; capturing the pre-rename identity
    Applying,
    AwaitingConfirmation,
    Committed,
    RolledBack,
}

impl RenameState {
    /// Check if no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }
}

/// Illegal transition between two rename states
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal rename transition {from:?} -> {to:?}")]
pub struct IllegalTransition {
    pub from: RenameState,
    pub to: RenameState,
}

/// Validates a state transition
///
/// # Errors
/// Returns `IllegalTransition` when `to` is not reachable from `from`
pub fn validate_transition(from: RenameState, to: RenameState) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

#[must_use]
pub fn allowed_transitions(from: RenameState) -> &'static [RenameState] {
    use RenameState::*;
    match from {
        Idle => &[Validating],
        Validating => &[Idle, Applying],
        Applying => &[Idle, AwaitingConfirmation],
        AwaitingConfirmation => &[Committed, RolledBack],
        Committed | RolledBack => &[],
    }
}

/// Tracks the state of a single invocation
#[derive(Debug)]
pub(crate) struct RenameRun {
    state: RenameState,
}

impl RenameRun {
    pub(crate) fn new() -> Self {
        Self {
            state: RenameState::Idle,
        }
    }

    pub(crate) fn state(&self) -> RenameState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: RenameState) {
        debug_assert!(
            validate_transition(self.state, next).is_ok(),
            "illegal rename transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(from = ?self.state, to = ?next, "rename state transition");
        self.state = next;
    }
}

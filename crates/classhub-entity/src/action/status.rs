//! Action record status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a recorded action.
///
/// `Pending` is the only state from which transitions happen; `Undone`
/// and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Inside the undo window, not yet undone.
    Pending,
    /// Undone by the owner within the window.
    Undone,
    /// The window closed without an undo.
    Expired,
}

impl ActionStatus {
    /// Check whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check whether the given transition is legal.
    pub fn can_transition_to(&self, next: ActionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Undone) | (Self::Pending, Self::Expired)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Undone => "undone",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = classhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "undone" => Ok(Self::Undone),
            "expired" => Ok(Self::Expired),
            _ => Err(classhub_core::AppError::validation(format!(
                "Invalid action status: '{s}'. Expected one of: pending, undone, expired"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ActionStatus::Pending.is_terminal());
        assert!(ActionStatus::Undone.is_terminal());
        assert!(ActionStatus::Expired.is_terminal());
    }

    #[test]
    fn test_transitions() {
        assert!(ActionStatus::Pending.can_transition_to(ActionStatus::Undone));
        assert!(ActionStatus::Pending.can_transition_to(ActionStatus::Expired));
        assert!(!ActionStatus::Undone.can_transition_to(ActionStatus::Pending));
        assert!(!ActionStatus::Expired.can_transition_to(ActionStatus::Undone));
    }
}

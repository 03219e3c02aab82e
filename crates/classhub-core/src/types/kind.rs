//! Entity kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The closed set of portal entity collections that support soft delete
/// and reversible actions.
///
/// Adding a collection means adding a variant here; every dispatch over
/// kinds is an exhaustive `match`, so the compiler points at each site
/// that needs a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Student roster records.
    Students,
    /// Class (course group) records.
    Classes,
    /// Per-student, per-date attendance entries.
    Attendance,
    /// Teacher task / to-do records.
    Tasks,
}

impl EntityKind {
    /// All kinds, in display order.
    pub const ALL: [EntityKind; 4] = [
        Self::Students,
        Self::Classes,
        Self::Attendance,
        Self::Tasks,
    ];

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Classes => "classes",
            Self::Attendance => "attendance",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "students" => Ok(Self::Students),
            "classes" => Ok(Self::Classes),
            "attendance" => Ok(Self::Attendance),
            "tasks" => Ok(Self::Tasks),
            _ => Err(AppError::validation(format!(
                "Invalid entity kind: '{s}'. Expected one of: students, classes, attendance, tasks"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "students".parse::<EntityKind>().unwrap(),
            EntityKind::Students
        );
        assert_eq!("TASKS".parse::<EntityKind>().unwrap(), EntityKind::Tasks);
        assert!("teachers".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&EntityKind::Attendance).unwrap();
        assert_eq!(json, "\"attendance\"");
    }
}

//! Attendance status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-day attendance state of one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Present in class.
    Present,
    /// Absent due to reported illness.
    Sick,
    /// Absent with prior permission.
    Excused,
    /// Absent without notice.
    Absent,
}

impl AttendanceStatus {
    /// Check whether the student was in class.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Sick => "sick",
            Self::Excused => "excused",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = classhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "sick" => Ok(Self::Sick),
            "excused" => Ok(Self::Excused),
            "absent" => Ok(Self::Absent),
            _ => Err(classhub_core::AppError::validation(format!(
                "Invalid attendance status: '{s}'. Expected one of: present, sick, excused, absent"
            ))),
        }
    }
}

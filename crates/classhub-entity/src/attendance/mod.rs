//! Attendance domain entities.

pub mod model;
pub mod status;

pub use model::AttendanceEntry;
pub use status::AttendanceStatus;

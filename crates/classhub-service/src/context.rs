//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classhub_core::types::id::UserId;

/// Context for the current request.
///
/// Passed into service methods so that every operation knows *who* is
/// acting; ownership checks compare against `user_id`. Because the id is
/// typed, "missing owner" is unrepresentable; constructing a context
/// already requires one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }

    /// Creates a context with an explicit request time.
    pub fn at(user_id: UserId, request_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            request_time,
        }
    }
}

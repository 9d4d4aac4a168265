use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::format_system_time;

/// Health payload returned by the `/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process answers at all.
    pub status: String,
    /// RFC 3339 timestamp of the check.
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a health response stamped with the current time.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".into(),
            timestamp: format_system_time(SystemTime::now()),
        }
    }
}

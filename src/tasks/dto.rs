use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Create/update body. Deliberately has no owner field: ownership comes from
/// the authenticated caller, not the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

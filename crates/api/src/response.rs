//! API response types.

use axum::Json;
use serde::Serialize;

/// Plain confirmation body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Create a confirmation response.
    pub fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

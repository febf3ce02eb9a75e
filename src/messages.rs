use serde::{Deserialize, Serialize};

/// Body of a `POST /chat` answer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of an error answer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

//! Response bodies exposed by the clients API endpoints.

use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub uri: String,
}

/// Found rows for a filtered listing.
#[derive(Debug, Serialize)]
pub struct ListResponse<C> {
    pub total: usize,
    pub content: Vec<C>,
}

/// Found rows for a lookup addressed by id.
#[derive(Debug, Serialize)]
pub struct LookupResponse<I, C> {
    pub total: usize,
    pub id: I,
    pub content: Vec<C>,
}

/// Successful lookup that matched nothing.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse<I> {
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<I>,
    pub message: &'static str,
}

/// Error body carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Body sent to the chapter generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChapterRequest {
    pub video_id: String,
}

/// Successful relay response: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChapterRelaySuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ChapterRelaySuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failed relay response: `{ "error": ..., "details": ... }`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChapterRelayFailure<D> {
    pub error: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub details: Option<D>,
}

//! Inbound request body shape.

use serde::Deserialize;

use super::response::Metadata;
use crate::timestamp::Timestamp;

/// JSON body accepted by write endpoints.
///
/// `payload` is required. A client-supplied `timestamp` must be a strict
/// ISO 8601 UTC string or deserialization fails.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody<T, M = Metadata> {
    pub payload: T,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub metadata: Option<M>,
}

impl<T, M> RequestBody<T, M> {
    /// Client timestamp, or the current instant when none was sent.
    pub fn timestamp_or_now(&self) -> Timestamp {
        self.timestamp.unwrap_or_else(Timestamp::now)
    }
}

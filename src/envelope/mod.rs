//! Standardized JSON bodies exchanged with API clients.

pub mod request;
pub mod response;

pub use request::RequestBody;
pub use response::{Metadata, ResponseBody, Status};

//! Shared HTTP building blocks

pub mod api_error;
pub mod api_response;
pub mod validated_json;

pub use api_error::{ApiError, ApiResult};
pub use api_response::{ApiResponse, EmptyData};
pub use validated_json::ValidatedJson;

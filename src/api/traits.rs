use async_trait::async_trait;

use crate::api::types::{ApiRequest, ApiResponse};
use crate::error::Result;

/// Sends one request to the backend.
/// Implementations return `Ok` only for 2xx answers; everything else is a `ClientError`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

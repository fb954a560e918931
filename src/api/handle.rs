use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::envelope;
use crate::api::traits::Transport;
use crate::api::types::{ApiRequest, ApiResponse};
use crate::error::Result;

/// Cheap, cloneable handle every resource module talks through.
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn Transport>,
}

impl Api {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.execute(request).await
    }

    pub async fn get(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.send(ApiRequest::get(path)).await?.body)
    }

    pub async fn get_with(
        &self,
        path: impl Into<String>,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        Ok(self.send(ApiRequest::get(path).query(query)).await?.body)
    }

    pub async fn post<B: Serialize>(&self, path: impl Into<String>, body: &B) -> Result<Value> {
        Ok(self.send(ApiRequest::post(path).json(body)?).await?.body)
    }

    pub async fn post_empty(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.send(ApiRequest::post(path)).await?.body)
    }

    pub async fn put<B: Serialize>(&self, path: impl Into<String>, body: &B) -> Result<Value> {
        Ok(self.send(ApiRequest::put(path).json(body)?).await?.body)
    }

    pub async fn put_empty(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.send(ApiRequest::put(path)).await?.body)
    }

    pub async fn delete(&self, path: impl Into<String>) -> Result<Value> {
        Ok(self.send(ApiRequest::delete(path)).await?.body)
    }

    /// GET a list endpoint and normalise its envelope.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        key: &str,
    ) -> Result<Vec<T>> {
        envelope::list_from(self.get(path).await?, key)
    }

    pub async fn list_with<T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        key: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<T>> {
        envelope::list_from(self.get_with(path, query).await?, key)
    }

    /// GET a single-document endpoint; a missing document is an error.
    pub async fn item<T: DeserializeOwned>(&self, path: impl Into<String>, key: &str) -> Result<T> {
        envelope::require_item(self.get(path).await?, key)
    }

    pub async fn maybe_item<T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        key: &str,
    ) -> Result<Option<T>> {
        envelope::item_from(self.get(path).await?, key)
    }
}

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::traits::Transport;
use crate::api::types::{message_of, ApiRequest, ApiResponse, Body, FilePart};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::SessionHandle;

/// reqwest-backed transport.
///
/// Joins relative paths onto the base URL and attaches `Authorization: Bearer <token>`
/// whenever the shared session holds a token. No retries.
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rental-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Everything up to `send`, split out so header and URL handling can be inspected.
    fn prepare(&self, request: ApiRequest) -> Result<RequestBuilder> {
        let url = self.url(&request.path);
        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            Body::Empty => builder,
            // `.json` also sets Content-Type: application/json
            Body::Json(value) => builder.json(&value),
            Body::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };

        Ok(builder)
    }
}

fn multipart_form(parts: Vec<FilePart>) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        let file = Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.mime)?;
        form = form.part(part.field, file);
    }
    Ok(form)
}

fn decode_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        debug!(?method, %path, "sending request");

        let response = self.prepare(request)?.send().await?;
        let status = response.status();
        let body = decode_body(response.text().await?);

        if !status.is_success() {
            let message = message_of(&body);
            warn!(?method, %path, %status, message = ?message, "request failed");
            return Err(ClientError::from_status(status, message));
        }

        debug!(?method, %path, %status, "request succeeded");
        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::session::{MemorySessionStore, Session, SessionHandle};
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;
    use std::sync::Arc;

    fn config() -> ClientConfig {
        ClientConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..ClientConfig::default()
        }
    }

    fn tenant() -> User {
        serde_json::from_value(json!({ "_id": "u1", "fullName": "Asha", "role": "Tenant" }))
            .unwrap()
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let session = SessionHandle::open(Arc::new(MemorySessionStore::default()))
            .await
            .unwrap();
        let client = HttpClient::new(&config(), session).unwrap();

        let request = client
            .prepare(ApiRequest::get("/tenant/bookings"))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:5000/api/tenant/bookings");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn token_is_injected_as_bearer() {
        let session = SessionHandle::open(Arc::new(MemorySessionStore::default()))
            .await
            .unwrap();
        session
            .sign_in(Session {
                token: "abc.def.ghi".to_string(),
                user: tenant(),
            })
            .await
            .unwrap();
        let client = HttpClient::new(&config(), session).unwrap();

        let request = client
            .prepare(
                ApiRequest::post("tenant/bookings/check-availability")
                    .json(&json!({ "propertyId": "p1" }))
                    .unwrap()
                    .query(vec![("page".into(), "1".into())]),
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc.def.ghi");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(request.url().query(), Some("page=1"));
    }

    #[test]
    fn bodies_fall_back_to_text() {
        assert_eq!(decode_body(String::new()), Value::Null);
        assert_eq!(decode_body("{\"a\":1}".into()), json!({ "a": 1 }));
        assert_eq!(decode_body("Bad Gateway".into()), json!("Bad Gateway"));
    }
}

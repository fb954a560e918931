use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::{Api, ApiRequest};
use crate::error::{ClientError, Result};
use crate::models::{Role, User};
use crate::session::{Session, SessionHandle};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Role picked on the login form; the admin endpoint ignores it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role_name: Role,
}

/// An entry of `/roles`, used to populate the role picker
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoleOption {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: Option<String>,
    user: Option<User>,
}

/// Login, registration, password recovery and logout.
#[derive(Clone)]
pub struct AuthApi {
    api: Api,
    session: SessionHandle,
}

impl AuthApi {
    pub fn new(api: Api, session: SessionHandle) -> Self {
        Self { api, session }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let body = self
            .api
            .post("/auth/login", credentials)
            .await
            .map_err(|err| err.or_fallback("Login failed"))?;
        self.establish(body).await
    }

    /// Refuses accounts whose role is not `Admin`, without persisting anything.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<Session> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        };
        let body = self
            .api
            .post("/admin/auth/login", &credentials)
            .await
            .map_err(|err| err.or_fallback("Admin login failed"))?;

        let session = session_from(body)?;
        if session.role() != Some(Role::Admin) {
            warn!(user_id = %session.user.id, "admin login with non-admin account");
            return Err(ClientError::Forbidden("Not an admin account".to_string()));
        }
        self.session.sign_in(session.clone()).await?;
        Ok(session)
    }

    /// Registration does not log in; the caller is sent to `/login` afterwards.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        self.api
            .post("/auth/register", registration)
            .await
            .map_err(|err| err.or_fallback("Registration failed"))?;
        info!(email = %registration.email, role = %registration.role_name, "account registered");
        Ok(())
    }

    pub async fn roles(&self) -> Result<Vec<RoleOption>> {
        self.api.list("/roles", "roles").await
    }

    pub async fn me(&self) -> Result<User> {
        self.api.item("/auth/me", "user").await
    }

    /// Requests a one-time password by email and returns the server's confirmation.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let request = ApiRequest::post("/auth/forgot-password").json(&json!({ "email": email }))?;
        let response = self
            .api
            .send(request)
            .await
            .map_err(|err| err.or_fallback("Failed to send OTP"))?;
        Ok(response
            .message()
            .unwrap_or_else(|| "OTP sent to your email!".to_string()))
    }

    /// Verifies the one-time password; success logs the user in.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Session> {
        let body = self
            .api
            .post(
                "/auth/verify-otp",
                &json!({ "email": email, "otp": otp }),
            )
            .await
            .map_err(|err| err.or_fallback("Invalid OTP"))?;
        self.establish(body).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.sign_out().await
    }

    async fn establish(&self, body: Value) -> Result<Session> {
        let session = session_from(body)?;
        self.session.sign_in(session.clone()).await?;
        Ok(session)
    }
}

/// Accepts `{ token, user }` or the same wrapped in `{ data: ... }`.
fn session_from(body: Value) -> Result<Session> {
    let payload = match body.get("data") {
        Some(inner) if inner.get("token").is_some() => inner.clone(),
        _ => body,
    };
    let payload: AuthPayload = serde_json::from_value(payload)?;
    match (payload.token, payload.user) {
        (Some(token), Some(user)) if !token.is_empty() => Ok(Session { token, user }),
        _ => Err(ClientError::Decode(
            "auth response is missing token or user".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, Method, MockTransport};
    use crate::session::{AuthState, MemorySessionStore};
    use std::sync::Arc;

    async fn auth_with(mock: MockTransport) -> (AuthApi, SessionHandle) {
        let session = SessionHandle::open(Arc::new(MemorySessionStore::default()))
            .await
            .unwrap();
        (AuthApi::new(Api::new(Arc::new(mock)), session.clone()), session)
    }

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|req| {
                req.method == Method::Post
                    && req.path == "/auth/login"
                    && req.json_body().unwrap()["role"] == "Tenant"
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::ok(json!({
                    "token": "jwt-token",
                    "user": { "_id": "u1", "fullName": "Asha", "role": "Tenant" }
                })))
            });

        let (auth, session) = auth_with(mock).await;
        let logged_in = auth
            .login(&Credentials {
                email: "asha@example.com".into(),
                password: "secret".into(),
                role: Some(Role::Tenant),
            })
            .await
            .unwrap();

        assert_eq!(logged_in.role(), Some(Role::Tenant));
        assert_eq!(session.state(), AuthState::Authenticated);
        assert_eq!(session.token().as_deref(), Some("jwt-token"));
    }

    #[tokio::test]
    async fn failed_login_keeps_server_message_and_session_empty() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Err(ClientError::from_status(
                reqwest::StatusCode::BAD_REQUEST,
                Some("Invalid credentials".into()),
            ))
        });

        let (auth, session) = auth_with(mock).await;
        let err = auth
            .login(&Credentials {
                email: "x@example.com".into(),
                password: "nope".into(),
                role: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn admin_login_rejects_non_admins() {
        let mut mock = MockTransport::new();
        mock.expect_execute().returning(|_| {
            Ok(ApiResponse::ok(json!({
                "token": "jwt",
                "user": { "_id": "o1", "role": "Owner" }
            })))
        });

        let (auth, session) = auth_with(mock).await;
        let err = auth.admin_login("o@example.com", "pw").await.unwrap_err();

        assert!(matches!(err, ClientError::Forbidden(ref msg) if msg == "Not an admin account"));
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn response_without_token_is_rejected() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .returning(|_| Ok(ApiResponse::ok(json!({ "message": "ok" }))));

        let (auth, _) = auth_with(mock).await;
        let err = auth.verify_otp("a@example.com", "123456").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}

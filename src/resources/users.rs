use serde::Serialize;
use tracing::info;

use crate::api::{envelope, Api, ApiRequest, QueryBuilder};
use crate::error::{ClientError, Result};
use crate::media::UploadBatch;
use crate::models::{Role, User};

#[derive(Debug, Clone, Default)]
pub struct AdminUserQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl PasswordChange {
    fn validate(&self) -> Result<()> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Err(ClientError::Validation(
                "Please fill in all password fields".to_string(),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

/// Admin account management.
#[derive(Clone)]
pub struct UsersApi {
    api: Api,
}

impl UsersApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &AdminUserQuery) -> Result<Vec<User>> {
        let params = QueryBuilder::new()
            .push_opt("role", query.role)
            .push_opt("search", query.search.as_deref())
            .build();
        self.api.list_with("/admin/users", "users", params).await
    }

    pub async fn block(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(format!("/admin/users/{id}/block"))
            .await
            .map_err(|err| err.or_fallback("Failed to block user"))?;
        info!(user_id = %id, "user blocked");
        Ok(())
    }

    pub async fn unblock(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(format!("/admin/users/{id}/unblock"))
            .await
            .map_err(|err| err.or_fallback("Failed to unblock user"))?;
        info!(user_id = %id, "user unblocked");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api
            .delete(format!("/admin/users/{id}"))
            .await
            .map_err(|err| err.or_fallback("Failed to delete user"))?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub async fn block_and_refresh(&self, id: &str, query: &AdminUserQuery) -> Result<Vec<User>> {
        self.block(id).await?;
        self.list(query).await
    }

    pub async fn unblock_and_refresh(
        &self,
        id: &str,
        query: &AdminUserQuery,
    ) -> Result<Vec<User>> {
        self.unblock(id).await?;
        self.list(query).await
    }

    pub async fn delete_and_refresh(&self, id: &str, query: &AdminUserQuery) -> Result<Vec<User>> {
        self.delete(id).await?;
        self.list(query).await
    }
}

struct ProfilePaths {
    profile: &'static str,
    password: &'static str,
    avatar: Option<&'static str>,
}

fn paths_for(role: Role) -> ProfilePaths {
    match role {
        Role::Owner => ProfilePaths {
            profile: "/profile",
            password: "/profile/password",
            avatar: Some("/profile/avatar"),
        },
        Role::Tenant => ProfilePaths {
            profile: "/tenant/profile",
            password: "/tenant/profile/change-password",
            avatar: Some("/tenant/profile/avatar"),
        },
        Role::Admin => ProfilePaths {
            profile: "/admin/auth/me",
            password: "/admin/auth/change-password",
            avatar: None,
        },
    }
}

/// The signed-in user's own profile. Each role has its own endpoints.
#[derive(Clone)]
pub struct ProfileApi {
    api: Api,
}

impl ProfileApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn get(&self, role: Role) -> Result<User> {
        self.api.item(paths_for(role).profile, "user").await
    }

    pub async fn update(&self, role: Role, update: &ProfileUpdate) -> Result<Option<User>> {
        let body = self
            .api
            .put(paths_for(role).profile, update)
            .await
            .map_err(|err| err.or_fallback("Failed to update profile"))?;
        info!(%role, "profile updated");
        envelope::item_from(body, "user")
    }

    pub async fn change_password(&self, role: Role, change: &PasswordChange) -> Result<()> {
        change.validate()?;
        self.api
            .put(paths_for(role).password, change)
            .await
            .map_err(|err| err.or_fallback("Failed to change password"))?;
        info!(%role, "password changed");
        Ok(())
    }

    pub async fn upload_avatar(&self, role: Role, batch: UploadBatch) -> Result<Option<User>> {
        let path = paths_for(role).avatar.ok_or_else(|| {
            ClientError::Validation(format!("{role} accounts have no profile picture"))
        })?;
        let parts = batch.into_parts()?;
        let response = self
            .api
            .send(ApiRequest::put(path).multipart(parts))
            .await
            .map_err(|err| err.or_fallback("Avatar upload failed"))?;
        info!(%role, "avatar uploaded");
        envelope::item_from(response.body, "user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, Method, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn block_is_followed_by_a_reload() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|req| req.method == Method::Put && req.path == "/admin/users/u7/block")
            .times(1)
            .returning(|_| Ok(ApiResponse::ok(json!({ "message": "blocked" }))));
        mock.expect_execute()
            .withf(|req| req.method == Method::Get && req.path == "/admin/users")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::ok(json!({ "users": [
                    { "_id": "u7", "fullName": "Ravi", "isBlocked": true }
                ]})))
            });

        let users = UsersApi::new(Api::new(Arc::new(mock)))
            .block_and_refresh("u7", &AdminUserQuery::default())
            .await
            .unwrap();
        assert!(users[0].is_blocked);
    }

    #[tokio::test]
    async fn profile_paths_follow_the_role() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|req| req.path == "/tenant/profile")
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::ok(json!({ "user": { "_id": "t1", "fullName": "Meera" } })))
            });
        let user = ProfileApi::new(Api::new(Arc::new(mock)))
            .get(Role::Tenant)
            .await
            .unwrap();
        assert_eq!(user.full_name, "Meera");
    }

    #[tokio::test]
    async fn mismatched_passwords_are_caught_locally() {
        let err = ProfileApi::new(Api::new(Arc::new(MockTransport::new())))
            .change_password(
                Role::Owner,
                &PasswordChange {
                    current_password: "old".into(),
                    new_password: "new-secret".into(),
                    confirm_password: "new-secrets".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Passwords do not match");
    }

    #[test]
    fn confirmation_is_not_sent() {
        let body = serde_json::to_value(PasswordChange {
            current_password: "a".into(),
            new_password: "b".into(),
            confirm_password: "b".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "currentPassword": "a", "newPassword": "b" }));
    }

    #[tokio::test]
    async fn admins_cannot_upload_avatars() {
        let mut batch = UploadBatch::avatar();
        batch.add_bytes("me.png", vec![1]);
        let err = ProfileApi::new(Api::new(Arc::new(MockTransport::new())))
            .upload_avatar(Role::Admin, batch)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}

use serde::Serialize;
use tracing::info;

use crate::api::Api;
use crate::error::{ClientError, Result};
use crate::models::{Notification, Role};

/// An admin message, to one user or broadcast to a role.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Announcement {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(ClientError::Validation(
                "Title and message are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationsApi {
    api: Api,
}

impl NotificationsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn mine(&self) -> Result<Vec<Notification>> {
        self.api.list("/tenant/notifications", "notifications").await
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(format!("/tenant/notifications/{id}/read"))
            .await?;
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.put_empty("/tenant/notifications/read-all").await?;
        info!("all notifications marked read");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api
            .delete(format!("/tenant/notifications/{id}"))
            .await?;
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<()> {
        self.api.delete("/tenant/notifications").await?;
        info!("all notifications deleted");
        Ok(())
    }

    pub async fn admin_list(&self) -> Result<Vec<Notification>> {
        self.api.list("/admin/notifications", "notifications").await
    }

    pub async fn send(&self, announcement: &Announcement) -> Result<()> {
        announcement.validate()?;
        if announcement.user_id.is_none() {
            return Err(ClientError::Validation(
                "Select a user to notify".to_string(),
            ));
        }
        self.api
            .post("/admin/notifications/send", announcement)
            .await
            .map_err(|err| err.or_fallback("Failed to send notification"))?;
        info!(user_id = ?announcement.user_id, "notification sent");
        Ok(())
    }

    pub async fn broadcast(&self, announcement: &Announcement) -> Result<()> {
        announcement.validate()?;
        self.api
            .post("/admin/notifications/broadcast", announcement)
            .await
            .map_err(|err| err.or_fallback("Failed to broadcast notification"))?;
        info!(role = ?announcement.role, "notification broadcast");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, MockTransport};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn broadcast_targets_a_role() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|req| {
                let body = req.json_body().unwrap();
                req.path == "/admin/notifications/broadcast"
                    && body["role"] == "Owner"
                    && body.get("userId").is_none()
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::ok(json!({ "message": "sent" }))));

        NotificationsApi::new(Api::new(Arc::new(mock)))
            .broadcast(&Announcement {
                title: "Maintenance".into(),
                message: "Portal down Sunday 2-4am".into(),
                user_id: None,
                role: Some(Role::Owner),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn direct_send_needs_a_recipient() {
        let err = NotificationsApi::new(Api::new(Arc::new(MockTransport::new())))
            .send(&Announcement {
                title: "Hi".into(),
                message: "Welcome".into(),
                user_id: None,
                role: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}

use serde_json::json;
use tracing::info;

use crate::api::Api;
use crate::error::Result;
use crate::models::{ModerationStatus, Report, SupportTicket};

/// Admin handling of abuse reports and support tickets.
#[derive(Clone)]
pub struct ModerationApi {
    api: Api,
}

impl ModerationApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn reports(&self) -> Result<Vec<Report>> {
        self.api.list("/admin/reports", "reports").await
    }

    pub async fn set_report_status(&self, id: &str, status: ModerationStatus) -> Result<()> {
        self.api
            .put(format!("/admin/reports/{id}/status"), &json!({ "status": status }))
            .await
            .map_err(|err| err.or_fallback("Failed to update report"))?;
        info!(report_id = %id, ?status, "report status updated");
        Ok(())
    }

    pub async fn set_report_status_and_refresh(
        &self,
        id: &str,
        status: ModerationStatus,
    ) -> Result<Vec<Report>> {
        self.set_report_status(id, status).await?;
        self.reports().await
    }

    pub async fn delete_report(&self, id: &str) -> Result<Vec<Report>> {
        self.api.delete(format!("/admin/reports/{id}")).await?;
        info!(report_id = %id, "report deleted");
        self.reports().await
    }

    pub async fn tickets(&self) -> Result<Vec<SupportTicket>> {
        self.api.list("/admin/support", "tickets").await
    }

    pub async fn set_ticket_status(&self, id: &str, status: ModerationStatus) -> Result<()> {
        self.api
            .put(format!("/admin/support/{id}/status"), &json!({ "status": status }))
            .await
            .map_err(|err| err.or_fallback("Failed to update ticket"))?;
        info!(ticket_id = %id, ?status, "ticket status updated");
        Ok(())
    }

    pub async fn set_ticket_status_and_refresh(
        &self,
        id: &str,
        status: ModerationStatus,
    ) -> Result<Vec<SupportTicket>> {
        self.set_ticket_status(id, status).await?;
        self.tickets().await
    }

    pub async fn assign_ticket(&self, id: &str, user_id: &str) -> Result<Vec<SupportTicket>> {
        self.api
            .put(format!("/admin/support/{id}/assign"), &json!({ "userId": user_id }))
            .await
            .map_err(|err| err.or_fallback("Failed to assign ticket"))?;
        info!(ticket_id = %id, %user_id, "ticket assigned");
        self.tickets().await
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<Vec<SupportTicket>> {
        self.api.delete(format!("/admin/support/{id}")).await?;
        info!(ticket_id = %id, "ticket deleted");
        self.tickets().await
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::api::{envelope, Api};
use crate::error::{ClientError, Result};
use crate::models::{Visit, VisitStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub property_id: String,
    pub visit_date: NaiveDate,
    pub time_slot: String,
}

#[derive(Clone)]
pub struct VisitsApi {
    api: Api,
}

impl VisitsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn schedule(&self, visit: &NewVisit, today: NaiveDate) -> Result<Option<Visit>> {
        if visit.visit_date < today {
            return Err(ClientError::Validation(
                "Visit date cannot be in the past".to_string(),
            ));
        }
        let body = self
            .api
            .post("/tenant/visits", visit)
            .await
            .map_err(|err| err.or_fallback("Failed to schedule visit"))?;
        info!(property_id = %visit.property_id, date = %visit.visit_date, "visit scheduled");
        envelope::item_from(body, "visit")
    }

    pub async fn mine(&self) -> Result<Vec<Visit>> {
        self.api.list("/tenant/visits", "visits").await
    }

    pub async fn get_mine(&self, id: &str) -> Result<Visit> {
        self.api.item(format!("/tenant/visits/{id}"), "visit").await
    }

    pub async fn cancel(&self, id: &str, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(ClientError::Validation(
                "A cancellation reason is required".to_string(),
            ));
        }
        self.api
            .put(format!("/tenant/visits/{id}/cancel"), &json!({ "reason": reason }))
            .await
            .map_err(|err| err.or_fallback("Failed to cancel visit"))?;
        info!(visit_id = %id, "visit cancelled");
        Ok(())
    }

    pub async fn cancel_and_refresh(&self, id: &str, reason: &str) -> Result<Vec<Visit>> {
        self.cancel(id, reason).await?;
        self.mine().await
    }

    pub async fn owner_visits(&self) -> Result<Vec<Visit>> {
        self.api.list("/dashboard/owner/visits", "visits").await
    }

    pub async fn set_owner_status(&self, id: &str, status: VisitStatus) -> Result<()> {
        self.api
            .put(
                format!("/dashboard/owner/visits/{id}/status"),
                &json!({ "status": status }),
            )
            .await
            .map_err(|err| err.or_fallback("Failed to update visit"))?;
        info!(visit_id = %id, status = status.as_str(), "owner updated visit status");
        Ok(())
    }

    pub async fn set_owner_status_and_refresh(
        &self,
        id: &str,
        status: VisitStatus,
    ) -> Result<Vec<Visit>> {
        self.set_owner_status(id, status).await?;
        self.owner_visits().await
    }
}

use serde_json::Value;

use crate::api::Api;
use crate::error::Result;

/// Aggregate endpoints. Their shapes are chart-specific, so bodies pass through untyped.
#[derive(Clone)]
pub struct DashboardsApi {
    api: Api,
}

impl DashboardsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn tenant_summary(&self) -> Result<Value> {
        self.api.get("/tenant/dashboard").await
    }

    pub async fn owner_stats(&self) -> Result<Value> {
        self.api.get("/dashboard/owner/stats").await
    }

    pub async fn admin_summary(&self) -> Result<Value> {
        self.api.get("/admin/dashboard/summary").await
    }

    pub async fn admin_bookings_trend(&self) -> Result<Value> {
        self.api.get("/admin/dashboard/bookings-trend").await
    }

    pub async fn admin_revenue_trend(&self) -> Result<Value> {
        self.api.get("/admin/dashboard/revenue-trend").await
    }

    pub async fn admin_property_status(&self) -> Result<Value> {
        self.api.get("/admin/dashboard/property-status").await
    }

    pub async fn admin_top_owners(&self) -> Result<Value> {
        self.api.get("/admin/dashboard/top-owners").await
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::api::{envelope, Api, ApiRequest, QueryBuilder};
use crate::error::{ClientError, Result};
use crate::media::UploadBatch;
use crate::models::{Amenity, ApprovalStatus, Location, Property, PropertyStatus};

pub const DEFAULT_PAGE_SIZE: u32 = 9;
const DEFAULT_SORT: &str = "-createdAt";

/// Fields an owner submits when listing or editing a property.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
}

/// Tenant browsing filters. Only approved, available listings are ever requested.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub city: Option<String>,
    pub bedrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            search: None,
            city: None,
            bedrooms: None,
            min_price: None,
            max_price: None,
            sort: DEFAULT_SORT.to_string(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowseQuery {
    pub fn params(&self) -> Vec<(String, String)> {
        QueryBuilder::new()
            .push("approvalStatus", ApprovalStatus::Approved.as_str())
            .push("status", PropertyStatus::Available.as_str())
            .push_opt("search", self.search.as_deref())
            .push_opt("city", self.city.as_deref())
            .push_opt("bedrooms", self.bedrooms)
            .push_opt("minPrice", self.min_price)
            .push_opt("maxPrice", self.max_price)
            .push("sort", &self.sort)
            .push("page", self.page.max(1))
            .push("limit", self.limit)
            .build()
    }
}

/// Values for the city and bedroom pickers
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FilterOptions {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub bedrooms: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminPropertyQuery {
    pub approval_status: Option<ApprovalStatus>,
    pub search: Option<String>,
}

/// Public, owner, tenant and admin listing endpoints plus image management.
#[derive(Clone)]
pub struct PropertiesApi {
    api: Api,
}

impl PropertiesApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self, params: Vec<(String, String)>) -> Result<Vec<Property>> {
        self.api.list_with("/properties", "properties", params).await
    }

    pub async fn get(&self, id: &str) -> Result<Property> {
        self.api.item(format!("/properties/{id}"), "property").await
    }

    pub async fn search(&self, text: &str) -> Result<Vec<Property>> {
        let params = QueryBuilder::new().push("q", text).build();
        self.api
            .list_with("/properties/search", "properties", params)
            .await
    }

    pub async fn create(&self, draft: &PropertyDraft) -> Result<Option<Property>> {
        let body = self
            .api
            .post("/properties", draft)
            .await
            .map_err(|err| err.or_fallback("Failed to create property"))?;
        info!(title = %draft.title, price = draft.price, "property created");
        envelope::item_from(body, "property")
    }

    pub async fn update(&self, id: &str, draft: &PropertyDraft) -> Result<Option<Property>> {
        let body = self
            .api
            .put(format!("/properties/{id}"), draft)
            .await
            .map_err(|err| err.or_fallback("Failed to update property"))?;
        info!(property_id = %id, "property updated");
        envelope::item_from(body, "property")
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api
            .delete(format!("/properties/{id}"))
            .await
            .map_err(|err| err.or_fallback("Failed to delete property"))?;
        info!(property_id = %id, "property deleted");
        Ok(())
    }

    pub async fn owner_all(&self) -> Result<Vec<Property>> {
        self.api.list("/properties/owner/all", "properties").await
    }

    pub async fn browse(&self, query: &BrowseQuery) -> Result<Vec<Property>> {
        self.api
            .list_with("/tenant/properties", "properties", query.params())
            .await
    }

    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let body = self.api.get("/tenant/properties/filters").await?;
        let payload = match body.get("data") {
            Some(inner) if inner.is_object() => inner.clone(),
            _ => body,
        };
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn tenant_get(&self, id: &str) -> Result<Property> {
        self.api
            .item(format!("/tenant/properties/{id}"), "property")
            .await
    }

    pub async fn similar(&self, id: &str) -> Result<Vec<Property>> {
        self.api
            .list(format!("/tenant/properties/{id}/similar"), "properties")
            .await
    }

    pub async fn admin_all(&self, query: &AdminPropertyQuery) -> Result<Vec<Property>> {
        let params = QueryBuilder::new()
            .push_opt("approvalStatus", query.approval_status.map(|s| s.as_str()))
            .push_opt("search", query.search.as_deref())
            .build();
        self.api
            .list_with("/admin/properties", "properties", params)
            .await
    }

    pub async fn approve(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(format!("/admin/properties/{id}/approve"))
            .await
            .map_err(|err| err.or_fallback("Failed to approve property"))?;
        info!(property_id = %id, "property approved");
        Ok(())
    }

    pub async fn reject(&self, id: &str, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(ClientError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }
        self.api
            .put(
                format!("/admin/properties/{id}/reject"),
                &json!({ "reason": reason }),
            )
            .await
            .map_err(|err| err.or_fallback("Failed to reject property"))?;
        info!(property_id = %id, "property rejected");
        Ok(())
    }

    pub async fn approve_and_refresh(
        &self,
        id: &str,
        query: &AdminPropertyQuery,
    ) -> Result<Vec<Property>> {
        self.approve(id).await?;
        self.admin_all(query).await
    }

    pub async fn reject_and_refresh(
        &self,
        id: &str,
        reason: &str,
        query: &AdminPropertyQuery,
    ) -> Result<Vec<Property>> {
        self.reject(id, reason).await?;
        self.admin_all(query).await
    }

    pub async fn set_status(&self, id: &str, status: PropertyStatus) -> Result<()> {
        self.api
            .put(
                format!("/admin/properties/{id}/status"),
                &json!({ "status": status }),
            )
            .await?;
        info!(property_id = %id, status = status.as_str(), "property status changed");
        Ok(())
    }

    pub async fn admin_delete(&self, id: &str) -> Result<()> {
        self.api.delete(format!("/admin/properties/{id}")).await?;
        info!(property_id = %id, "admin deleted property");
        Ok(())
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.api.list("/locations", "locations").await
    }

    pub async fn amenities(&self) -> Result<Vec<Amenity>> {
        self.api.list("/amenities", "amenities").await
    }

    /// Sends every queued image in one multipart request under `images`.
    pub async fn upload_images(&self, id: &str, batch: UploadBatch) -> Result<Value> {
        let count = batch.len();
        let parts = batch.into_parts()?;
        let response = self
            .api
            .send(ApiRequest::post(format!("/properties/upload/{id}")).multipart(parts))
            .await
            .map_err(|err| err.or_fallback("Image upload failed"))?;
        info!(property_id = %id, count, "property images uploaded");
        Ok(response.body)
    }

    pub async fn delete_image(&self, image_id: &str) -> Result<()> {
        self.api
            .delete(format!("/properties/image/{image_id}"))
            .await
            .map_err(|err| err.or_fallback("Failed to delete image"))?;
        info!(%image_id, "property image deleted");
        Ok(())
    }
}

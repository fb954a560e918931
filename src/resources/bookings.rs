use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::{envelope, Api, QueryBuilder};
use crate::error::{ClientError, Result};
use crate::models::{Booking, BookingStatus};
use crate::workflow::booking::BookingGateway;

/// Body of the availability check
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub property_id: String,
    pub booking_start_date: NaiveDate,
    pub booking_end_date: NaiveDate,
}

/// Body of the booking creation; `total_amount` is sent verbatim
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub property_id: String,
    pub booking_start_date: NaiveDate,
    pub booking_end_date: NaiveDate,
    pub total_amount: f64,
}

/// Filters for the admin booking list
#[derive(Debug, Clone, Default)]
pub struct AdminBookingQuery {
    pub status: Option<BookingStatus>,
    pub search: Option<String>,
}

/// Tenant, owner and admin booking endpoints.
#[derive(Clone)]
pub struct BookingsApi {
    api: Api,
}

impl BookingsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Advisory only: the server still has to reject overlapping bookings.
    pub async fn check_availability(&self, query: &AvailabilityQuery) -> Result<bool> {
        let body = self
            .api
            .post("/tenant/bookings/check-availability", query)
            .await
            .map_err(|err| err.or_fallback("Availability check failed"))?;
        availability_of(&body)
    }

    pub async fn create(&self, booking: &NewBooking) -> Result<Option<Booking>> {
        let body = self
            .api
            .post("/tenant/bookings", booking)
            .await
            .map_err(|err| err.or_fallback("Booking failed"))?;
        info!(
            property_id = %booking.property_id,
            total_amount = booking.total_amount,
            "booking created"
        );
        envelope::item_from(body, "booking")
    }

    pub async fn mine(&self) -> Result<Vec<Booking>> {
        self.api.list("/tenant/bookings", "bookings").await
    }

    pub async fn get_mine(&self, id: &str) -> Result<Booking> {
        self.api.item(format!("/tenant/bookings/{id}"), "booking").await
    }

    pub async fn cancel(&self, id: &str, reason: &str) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(ClientError::Validation(
                "A cancellation reason is required".to_string(),
            ));
        }
        self.api
            .put(format!("/tenant/bookings/{id}/cancel"), &json!({ "reason": reason }))
            .await
            .map_err(|err| err.or_fallback("Failed to cancel booking"))?;
        info!(booking_id = %id, "booking cancelled by tenant");
        Ok(())
    }

    pub async fn cancel_and_refresh(&self, id: &str, reason: &str) -> Result<Vec<Booking>> {
        self.cancel(id, reason).await?;
        self.mine().await
    }

    pub async fn owner_bookings(&self) -> Result<Vec<Booking>> {
        self.api.list("/dashboard/owner/bookings", "bookings").await
    }

    pub async fn owner_booking(&self, id: &str) -> Result<Booking> {
        self.api
            .item(format!("/dashboard/owner/bookings/{id}"), "booking")
            .await
    }

    /// Owners confirm or cancel.
    pub async fn set_owner_status(&self, id: &str, status: BookingStatus) -> Result<()> {
        if !matches!(status, BookingStatus::Confirmed | BookingStatus::Cancelled) {
            return Err(ClientError::Validation(format!(
                "owners can only confirm or cancel bookings, not mark them {}",
                status.as_str()
            )));
        }
        self.api
            .put(
                format!("/dashboard/owner/bookings/{id}/status"),
                &json!({ "status": status }),
            )
            .await
            .map_err(|err| err.or_fallback("Failed to update booking status"))?;
        info!(booking_id = %id, status = status.as_str(), "owner updated booking status");
        Ok(())
    }

    pub async fn set_owner_status_and_refresh(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Vec<Booking>> {
        self.set_owner_status(id, status).await?;
        self.owner_bookings().await
    }

    pub async fn admin_bookings(&self, query: &AdminBookingQuery) -> Result<Vec<Booking>> {
        let params = QueryBuilder::new()
            .push_opt("status", query.status.map(|s| s.as_str()))
            .push_opt("search", query.search.as_deref())
            .build();
        self.api.list_with("/admin/bookings", "bookings", params).await
    }

    pub async fn set_admin_status(&self, id: &str, status: BookingStatus) -> Result<()> {
        self.api
            .put(format!("/admin/bookings/{id}/status"), &json!({ "status": status }))
            .await
            .map_err(|err| err.or_fallback("Failed to update booking status"))?;
        info!(booking_id = %id, status = status.as_str(), "admin updated booking status");
        Ok(())
    }

    pub async fn delete_admin(&self, id: &str) -> Result<()> {
        self.api
            .delete(format!("/admin/bookings/{id}"))
            .await
            .map_err(|err| err.or_fallback("Failed to delete booking"))?;
        info!(booking_id = %id, "admin deleted booking");
        Ok(())
    }
}

fn availability_of(body: &Value) -> Result<bool> {
    body.get("available")
        .or_else(|| body.get("data").and_then(|data| data.get("available")))
        .and_then(Value::as_bool)
        .ok_or_else(|| ClientError::Decode("availability response has no `available` flag".into()))
}

#[async_trait]
impl BookingGateway for BookingsApi {
    async fn check_availability(&self, query: &AvailabilityQuery) -> Result<bool> {
        BookingsApi::check_availability(self, query).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Option<Booking>> {
        self.create(booking).await
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Property, Ref, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[serde(other)]
    Other,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "propertyId", alias = "property")]
    pub property: Option<Ref<Property>>,
    #[serde(default, rename = "tenantId", alias = "tenant")]
    pub tenant: Option<Ref<User>>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub booking_start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub booking_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: BookingStatus,
    /// `"paid"` once a payment has been confirmed; anything else counts as unpaid
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

impl Booking {
    pub fn is_paid(&self) -> bool {
        self.payment_status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("paid"))
    }

    pub fn property_title(&self) -> Option<&str> {
        self.property
            .as_ref()
            .and_then(Ref::populated)
            .map(|property| property.title.as_str())
    }

    pub fn tenant_name(&self) -> Option<&str> {
        self.tenant
            .as_ref()
            .and_then(Ref::populated)
            .map(|tenant| tenant.full_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_owner_view_with_populated_refs() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "propertyId": { "_id": "p1", "title": "Diamond Apartment", "price": 1500 },
            "tenantId": { "_id": "u1", "fullName": "Ravi Shah" },
            "bookingStartDate": "2024-01-01T00:00:00.000Z",
            "bookingEndDate": "2024-01-04T00:00:00.000Z",
            "totalAmount": 4500,
            "status": "confirmed",
            "paymentStatus": "paid"
        }))
        .unwrap();

        assert_eq!(booking.property_title(), Some("Diamond Apartment"));
        assert_eq!(booking.tenant_name(), Some("Ravi Shah"));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.is_paid());
    }

    #[test]
    fn tenant_view_uses_property_key() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b2",
            "property": { "_id": "p9", "title": "City View Flats" },
            "totalAmount": 1800
        }))
        .unwrap();
        assert_eq!(booking.property_title(), Some("City View Flats"));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(!booking.is_paid());
    }
}

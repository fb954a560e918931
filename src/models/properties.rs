use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Ref, User};

/// Admin-controlled listing gate, independent of rental availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Other,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Rented,
    Inactive,
    #[serde(other)]
    Other,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Inactive => "inactive",
            PropertyStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Amenity {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Images arrive either as plain URLs or as stored image documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyImage {
    Url(String),
    Stored {
        #[serde(alias = "_id")]
        id: String,
        url: String,
    },
}

impl PropertyImage {
    pub fn url(&self) -> &str {
        match self {
            PropertyImage::Url(url) => url,
            PropertyImage::Stored { url, .. } => url,
        }
    }
}

/// A rental listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "type")]
    pub property_type: Option<String>,
    /// Price per day
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default, rename = "locationId", alias = "location")]
    pub location: Option<Ref<Location>>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
    #[serde(default, rename = "ownerId", alias = "owner")]
    pub owner: Option<Ref<User>>,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    #[serde(default)]
    pub is_wishlisted: bool,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Property {
    /// City of the populated location, if any.
    pub fn city(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|location| location.city.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_populated_listing() {
        let property: Property = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Gurukul Residency",
            "price": 1200,
            "bedrooms": 2,
            "approvalStatus": "approved",
            "status": "available",
            "locationId": { "_id": "l1", "city": "Surat" },
            "images": ["https://img/1.jpg", { "_id": "i2", "url": "https://img/2.jpg" }],
            "createdAt": "2024-03-01T08:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(property.approval_status, ApprovalStatus::Approved);
        assert_eq!(property.city(), Some("Surat"));
        assert_eq!(property.images[1].url(), "https://img/2.jpg");
        assert!(property.created_at.is_some());
    }

    #[test]
    fn unknown_status_strings_do_not_fail() {
        let property: Property = serde_json::from_value(json!({
            "_id": "p1",
            "approvalStatus": "under_review",
            "status": "maintenance"
        }))
        .unwrap();
        assert_eq!(property.approval_status, ApprovalStatus::Other);
        assert_eq!(property.status, Some(PropertyStatus::Other));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Property, Ref, User};

/// Existence of the entry means the tenant "liked" the property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "propertyId", alias = "property")]
    pub property: Ref<Property>,
    #[serde(default, rename = "tenantId", alias = "tenant")]
    pub tenant: Option<Ref<User>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "propertyId", alias = "property")]
    pub property: Option<Ref<Property>>,
    #[serde(default, rename = "tenantId", alias = "tenant")]
    pub tenant: Option<Ref<User>>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

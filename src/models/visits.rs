use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Property, Ref, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    #[default]
    Pending,
    Scheduled,
    Approved,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

impl VisitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::Approved => "approved",
            VisitStatus::Completed => "completed",
            VisitStatus::Cancelled => "cancelled",
            VisitStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "propertyId", alias = "property")]
    pub property: Option<Ref<Property>>,
    #[serde(default, rename = "tenantId", alias = "tenant")]
    pub tenant: Option<Ref<User>>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub visit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub status: VisitStatus,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

impl Visit {
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.visit_date.is_some_and(|date| date < now)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Ref, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    #[default]
    Pending,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "duration")]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "planId", alias = "plan")]
    pub plan: Option<Ref<Plan>>,
    #[serde(default, rename = "userId", alias = "user")]
    pub user: Option<Ref<User>>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Active and not past its validity window.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date.map_or(true, |end| end > now)
    }
}

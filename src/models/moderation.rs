use serde::{Deserialize, Serialize};

use super::{Property, Ref, User};

/// Status shared by abuse reports and support tickets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "reportedBy", alias = "reporter")]
    pub reporter: Option<Ref<User>>,
    #[serde(default, rename = "propertyId")]
    pub target_property: Option<Ref<Property>>,
    #[serde(default, rename = "reportedUser")]
    pub target_user: Option<Ref<User>>,
    #[serde(default, rename = "type", alias = "reportType")]
    pub report_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: ModerationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "userId", alias = "user")]
    pub user: Option<Ref<User>>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ModerationStatus,
    #[serde(default)]
    pub assigned_to: Option<Ref<User>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn in_progress_uses_snake_case() {
        let ticket: SupportTicket = serde_json::from_value(json!({
            "_id": "t1",
            "subject": "Refund",
            "status": "in_progress"
        }))
        .unwrap();
        assert_eq!(ticket.status, ModerationStatus::InProgress);
        assert_eq!(
            serde_json::to_value(ModerationStatus::InProgress).unwrap(),
            json!("in_progress")
        );
    }
}

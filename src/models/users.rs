use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// The three account kinds the front end routes on.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Owner,
    Tenant,
}

impl Role {
    /// Case-insensitive; the backend is inconsistent about `Owner` vs `owner`.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            "tenant" => Some(Role::Tenant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Owner => "Owner",
            Role::Tenant => "Tenant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Either "Tenant" or a populated role document { name: "Tenant" }.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Document { name: String },
        }

        let name = match Repr::deserialize(deserializer)? {
            Repr::Name(name) | Repr::Document { name } => name,
        };
        Role::parse(&name).ok_or_else(|| serde::de::Error::custom(format!("unknown role {name:?}")))
    }
}

/// Reads a role, treating names the client does not route on as no role.
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match Role::deserialize(&raw) {
        Ok(role) => Ok(Some(role)),
        Err(err) => {
            warn!(role = %raw, error = %err, "ignoring unrecognised role");
            Ok(None)
        }
    }
}

/// An account as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_decodes_from_string_or_document() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "fullName": "Asha Patel",
            "email": "asha@example.com",
            "role": { "_id": "r1", "name": "owner" }
        }))
        .unwrap();
        assert_eq!(user.role, Some(Role::Owner));

        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "email": "t@example.com",
            "role": "Tenant",
            "isBlocked": true
        }))
        .unwrap();
        assert_eq!(user.role, Some(Role::Tenant));
        assert!(user.is_blocked);
    }

    #[test]
    fn unrecognised_role_decodes_as_none() {
        assert!(serde_json::from_value::<Role>(json!("Landlord")).is_err());

        let user: User = serde_json::from_value(json!({
            "_id": "u3",
            "email": "l@example.com",
            "role": "Landlord"
        }))
        .unwrap();
        assert_eq!(user.role, None);

        let user: User = serde_json::from_value(json!({
            "_id": "u4",
            "role": { "name": "Landlord" }
        }))
        .unwrap();
        assert_eq!(user.role, None);

        let user: User = serde_json::from_value(json!({ "_id": "u5", "role": null })).unwrap();
        assert_eq!(user.role, None);
    }
}

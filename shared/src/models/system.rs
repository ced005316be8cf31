//! System model

use serde::Serialize;

/// One event/venue configuration. At most one system is `live` at a
/// time; every patron- and staff-facing query implicitly scopes to it.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct System {
    pub id: i64,
    pub name: String,
    /// Argon2 hash, never serialized out.
    #[serde(skip_serializing)]
    pub user_password: String,
    #[serde(skip_serializing)]
    pub admin_password: String,
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hashes_never_serialize() {
        let system = System {
            id: 1,
            name: "Zomerfeest".to_string(),
            user_password: "$argon2id$hash".to_string(),
            admin_password: "$argon2id$hash".to_string(),
            live: true,
        };

        let value = serde_json::to_value(&system).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("name"));
        assert!(!object.contains_key("user_password"));
        assert!(!object.contains_key("admin_password"));
    }
}

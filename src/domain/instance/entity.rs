// src/domain/instance/entity.rs
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A hosted instance. Only the fields the panel reads are typed; anything
/// else the daemon side stored is carried through in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Owner user id. Older records spell the field `User`.
    #[serde(default, alias = "User")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// MB.
    #[serde(default)]
    pub ram_usage: u64,
    /// GB.
    #[serde(default)]
    pub storage_usage: u64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Instance {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Notice shown on the instances page while `active`. Also reads the
/// Portuguese field names of the legacy `avisos` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "titulo")]
    pub title: String,
    #[serde(default, alias = "mensagem")]
    pub message: String,
    #[serde(default, alias = "ativo")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_usage_defaults_to_zero() {
        let inst: Instance = serde_json::from_str(r#"{"id":"i1","user":"u1"}"#).unwrap();
        assert_eq!(inst.ram_usage, 0);
        assert!(inst.is_owned_by("u1"));
        assert!(!inst.is_owned_by("u2"));
    }

    #[test]
    fn legacy_field_names_are_read() {
        let inst: Instance = serde_json::from_str(r#"{"id":"i1","User":"u1","Name":"x"}"#).unwrap();
        assert!(inst.is_owned_by("u1"));
        assert!(inst.extra.contains_key("Name"));

        let notice: Announcement =
            serde_json::from_str(r#"{"titulo":"Manutenção","mensagem":"hoje","ativo":true}"#).unwrap();
        assert!(notice.active);
        assert_eq!(notice.title, "Manutenção");
        assert_eq!(notice.message, "hoje");
    }
}

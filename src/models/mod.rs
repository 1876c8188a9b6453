use serde::{Deserialize, Serialize};

/// Backend account info object.
///
/// The auth backend returns this under the `user` field. We keep it flexible
/// to avoid breaking when backend fields evolve; only `username` is read.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl AccountInfo {
    pub fn username(&self) -> Option<&str> {
        self.extra
            .get("username")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// A single user note.
///
/// `id` is assigned by the backend; an empty id means the note was never
/// created remotely. The backend names the text field `note`, and leaves it
/// out of delete responses and deleted events, which carry only the id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Note {
    #[serde(default)]
    pub id: String,

    #[serde(default, rename = "note")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Note {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            owner: None,
        }
    }

    pub fn is_remote(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_wire_contract_uses_note_key() {
        let json = r#"{"id": "n-1", "note": "buy milk", "owner": "alice"}"#;
        let parsed: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(parsed.id, "n-1");
        assert_eq!(parsed.text, "buy milk");
        assert_eq!(parsed.owner.as_deref(), Some("alice"));

        let v = serde_json::to_value(Note::new("n-2", "x")).expect("should serialize");
        assert_eq!(v["note"], "x");
        assert!(v.get("owner").is_none());
    }

    #[test]
    fn test_note_without_id_is_not_remote() {
        let parsed: Note = serde_json::from_str(r#"{"note": "draft"}"#).expect("should parse");
        assert!(!parsed.is_remote());
        assert!(Note::new("1", "a").is_remote());
    }

    #[test]
    fn test_id_only_payload_parses_as_note() {
        let parsed: Note = serde_json::from_str(r#"{"id": "1"}"#).expect("id-only should parse");
        assert_eq!(parsed, Note::new("1", ""));
        assert!(parsed.is_remote());
    }

    #[test]
    fn test_account_info_username() {
        let user = AccountInfo {
            extra: serde_json::json!({"id": 1, "username": "alice"}),
        };
        assert_eq!(user.username(), Some("alice"));

        let blank = AccountInfo {
            extra: serde_json::json!({"username": "  "}),
        };
        assert!(blank.username().is_none());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential for an upstream service, e.g. `gcloud` for place search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEntry {
    pub id: String,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiKeyEntry {
    pub fn new(id: String, name: String, key: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            key,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this entry with everything but the last four characters of
    /// the key replaced by `*`.
    pub fn masked(&self) -> Self {
        let visible = 4.min(self.key.chars().count());
        let hidden = self.key.chars().count() - visible;
        let tail: String = self.key.chars().skip(hidden).collect();
        Self {
            key: format!("{}{}", "*".repeat(hidden), tail),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_keeps_only_the_tail() {
        let entry = ApiKeyEntry::new("gcloud".into(), "Google Cloud".into(), "AIzaSyABCDEF".into());
        assert_eq!(entry.masked().key, "********CDEF");

        let short = ApiKeyEntry::new("x".into(), "x".into(), "abc".into());
        assert_eq!(short.masked().key, "abc");
    }

    #[test]
    fn entries_serialize_with_camel_case_timestamps() {
        let entry = ApiKeyEntry::new("gcloud".into(), "Google Cloud".into(), "AIzaSyABCDEF".into());
        let json = serde_json::to_value(entry.masked()).unwrap();
        assert_eq!(json["key"], "********CDEF");
        assert!(json["createdAt"].is_string());
        assert!(json.get("created_at").is_none());

        let back: ApiKeyEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, entry.created_at);
        assert_eq!(back.id, "gcloud");
    }
}

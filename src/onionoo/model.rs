// src/onionoo/model.rs
use serde::Deserialize;
use serde_json::Value;

pub const GUARD_FLAG: &str = "Guard";
pub const EXIT_FLAG: &str = "Exit";

/// Subset of an Onionoo `details` document. Only `relays` and each relay's
/// `flags` list must have the expected shape; everything else is kept as raw
/// JSON and never type-checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsDocument {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub relays_published: Option<Value>,
    #[serde(default)]
    pub relays_truncated: Option<Value>,
    #[serde(default)]
    pub relays: Vec<RelayRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayRecord {
    #[serde(default)]
    pub nickname: Option<Value>,
    /// Non-string entries are tolerated and never match a flag.
    #[serde(default)]
    pub flags: Vec<Value>,
}

impl RelayRecord {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f.as_str() == Some(flag))
    }

    pub fn is_guard(&self) -> bool {
        self.has_flag(GUARD_FLAG)
    }

    pub fn is_exit(&self) -> bool {
        self.has_flag(EXIT_FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_relays_key_is_an_empty_list() {
        let doc: DetailsDocument =
            serde_json::from_str(r#"{"version":"8.0","relays_published":"2024-01-01 00:00:00"}"#)
                .unwrap();
        assert!(doc.relays.is_empty());
        assert_eq!(doc.version.as_ref().and_then(Value::as_str), Some("8.0"));
    }

    #[test]
    fn missing_flags_and_nickname_default() {
        let doc: DetailsDocument = serde_json::from_str(r#"{"relays":[{}]}"#).unwrap();
        assert_eq!(doc.relays.len(), 1);
        assert!(doc.relays[0].nickname.is_none());
        assert!(!doc.relays[0].is_guard());
        assert!(!doc.relays[0].is_exit());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc: DetailsDocument = serde_json::from_str(
            r#"{"bridges":[],"relays":[{"nickname":"a","flags":["Fast","Guard"],"or_addresses":["1.2.3.4:9001"]}]}"#,
        )
        .unwrap();
        assert!(doc.relays[0].is_guard());
        assert!(!doc.relays[0].is_exit());
    }

    #[test]
    fn uncounted_fields_of_any_type_are_accepted() {
        let doc: DetailsDocument = serde_json::from_str(
            r#"{"version":8,"relays_published":null,"relays_truncated":-1,
                "relays":[{"nickname":42,"flags":[1,"Guard",null,{"x":"Exit"}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.relays.len(), 1);
        assert!(doc.relays[0].is_guard());
        assert!(!doc.relays[0].is_exit());
    }

    #[test]
    fn flags_match_exactly() {
        let relay = RelayRecord {
            nickname: Some("x".into()),
            flags: vec!["BadExit".into(), "Guardian".into()],
        };
        assert!(!relay.is_exit());
        assert!(!relay.is_guard());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<DetailsDocument>(r#"{"relays":null}"#).is_err());
        assert!(serde_json::from_str::<DetailsDocument>(r#"{"relays":[{"flags":"Guard"}]}"#).is_err());
        assert!(serde_json::from_str::<DetailsDocument>(r#"{"relays":[{"flags":null}]}"#).is_err());
        assert!(serde_json::from_str::<DetailsDocument>(r#"{"relays":[7]}"#).is_err());
    }
}

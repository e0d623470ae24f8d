//! Record Identity
//!
//! Rows created in the browser carry a local placeholder until the
//! remote API assigns them a real id on submit.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved prefix of placeholder ids on the wire and in the DOM
pub const PENDING_PREFIX: char = '@';

/// Identity of a row that is either local-only or known to the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    /// Not yet persisted; the value mirrors the row's current position
    Pending(usize),
    /// Issued by the remote API
    Persisted(String),
}

impl RecordId {
    pub fn persisted(id: impl Into<String>) -> Self {
        RecordId::Persisted(id.into())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RecordId::Pending(_))
    }

    /// Server id, if this row has one
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            RecordId::Persisted(id) => Some(id),
            RecordId::Pending(_) => None,
        }
    }

    /// Parse a wire/DOM id. `@<n>` is a placeholder, anything else is a server id.
    pub fn parse(raw: &str) -> Self {
        raw.strip_prefix(PENDING_PREFIX)
            .and_then(|rest| rest.parse::<usize>().ok())
            .map(RecordId::Pending)
            .unwrap_or_else(|| RecordId::Persisted(raw.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Pending(index) => write!(f, "{}{}", PENDING_PREFIX, index),
            RecordId::Persisted(id) => f.write_str(id),
        }
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        RecordId::parse(raw)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Servers may send numeric ids
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(RecordId::parse(&s)),
            serde_json::Value::Number(n) => Ok(RecordId::Persisted(n.to_string())),
            other => Err(serde::de::Error::custom(format!("invalid record id: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholder() {
        assert_eq!(RecordId::parse("@0"), RecordId::Pending(0));
        assert_eq!(RecordId::parse("@12"), RecordId::Pending(12));
    }

    #[test]
    fn test_parse_server_id() {
        assert_eq!(RecordId::parse("a1"), RecordId::persisted("a1"));
        // Only a well-formed placeholder counts as pending
        assert_eq!(RecordId::parse("@x"), RecordId::persisted("@x"));
    }

    #[test]
    fn test_display() {
        assert_eq!(RecordId::Pending(3).to_string(), "@3");
        assert_eq!(RecordId::persisted("42").to_string(), "42");
    }

    #[test]
    fn test_deserialize_numeric_id() {
        let id: RecordId = serde_json::from_str("17").unwrap();
        assert_eq!(id, RecordId::persisted("17"));
        let id: RecordId = serde_json::from_str("\"@1\"").unwrap();
        assert!(id.is_pending());
    }
}

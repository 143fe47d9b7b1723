use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Join a stream's namespace and name into its registry lookup key.
///
/// The namespace (empty when absent) is prepended to the name with no
/// separator. Registry population and record lookup both go through this
/// function so the two sides cannot drift apart.
pub fn stream_lookup_key(namespace: Option<&str>, name: &str) -> String {
    let namespace = namespace.unwrap_or_default();
    let mut key = String::with_capacity(namespace.len() + name.len());
    key.push_str(namespace);
    key.push_str(name);
    key
}

/// Identity of a stream: optional namespace plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamKey {
    namespace: Option<String>,
    name: String,
}

impl StreamKey {
    pub fn new(namespace: Option<impl Into<String>>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            name: name.into(),
        }
    }

    /// Stream without a namespace.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key used to find the stream's schema in the registry.
    pub fn lookup_key(&self) -> String {
        stream_lookup_key(self.namespace(), &self.name)
    }

    /// Label used in diagnostics: `name`, or `namespace-name`.
    pub fn display_label(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}-{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label())
    }
}

/// A single record emitted by a source for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub stream: String,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitted_at: Option<i64>,
}

impl Record {
    pub fn new(namespace: Option<&str>, stream: &str, data: Value) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            stream: stream.to_string(),
            data,
            emitted_at: None,
        }
    }

    pub fn key(&self) -> StreamKey {
        StreamKey::new(self.namespace.as_deref(), self.stream.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_key_concatenates_without_separator() {
        assert_eq!(stream_lookup_key(Some("public"), "users"), "publicusers");
        assert_eq!(stream_lookup_key(None, "orders"), "orders");
        assert_eq!(
            StreamKey::new(Some("public"), "users").lookup_key(),
            stream_lookup_key(Some("public"), "users")
        );
    }

    #[test]
    fn empty_namespace_resolves_like_absent_namespace() {
        let empty = StreamKey::new(Some(""), "orders");
        assert_eq!(empty.lookup_key(), StreamKey::named("orders").lookup_key());
        assert_eq!(empty.display_label(), "-orders");
        assert_ne!(empty, StreamKey::named("orders"));
    }

    #[test]
    fn display_label_uses_hyphen_only_with_namespace() {
        assert_eq!(
            StreamKey::new(Some("public"), "users").display_label(),
            "public-users"
        );
        assert_eq!(StreamKey::named("orders").display_label(), "orders");
        assert_eq!(StreamKey::named("orders").to_string(), "orders");
    }

    #[test]
    fn record_deserializes_protocol_shape() {
        let record: Record = serde_json::from_value(json!({
            "stream": "users",
            "namespace": "public",
            "data": { "age": 30 },
            "emitted_at": 1700000000000i64
        }))
        .unwrap();

        assert_eq!(record.key(), StreamKey::new(Some("public"), "users"));
        assert_eq!(record.data, json!({ "age": 30 }));
        assert_eq!(record.emitted_at, Some(1700000000000));
    }

    #[test]
    fn record_without_namespace_has_bare_key() {
        let record: Record =
            serde_json::from_value(json!({ "stream": "orders", "data": {} })).unwrap();
        assert_eq!(record.namespace, None);
        assert_eq!(record.key().lookup_key(), "orders");
        assert_eq!(record.key().display_label(), "orders");
    }
}

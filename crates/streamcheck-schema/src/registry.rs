use std::collections::HashMap;

use jsonschema::Validator;
use serde_json::{Map, Value};

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::stream::StreamKey;

/// Dialect every stream schema is validated under.
pub const DRAFT_07_SCHEMA_URI: &str = "http://json-schema.org/draft-07/schema#";

/// A stream's dialect-pinned schema document and its compiled form.
pub struct StreamSchema {
    stream: StreamKey,
    document: Value,
    validator: Validator,
}

impl StreamSchema {
    pub fn stream(&self) -> &StreamKey {
        &self.stream
    }

    /// The schema document as registered, after dialect pinning.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

/// Stream-keyed registry of compiled JSON Schema validators.
///
/// Keys are produced by [`StreamKey::lookup_key`]. Once handed to a
/// [`StreamSchemaValidator`](crate::StreamSchemaValidator) the registry is
/// only ever read.
pub struct SchemaRegistry {
    schemas: HashMap<String, StreamSchema>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// Register a stream's schema from a JSON string.
    pub fn register(&mut self, stream: StreamKey, schema_json: &str) -> Result<()> {
        let schema: Value = serde_json::from_str(schema_json)?;
        self.register_value(stream, &schema)
    }

    /// Register a stream's schema from a JSON value.
    ///
    /// The stored copy has its `$schema` forced to Draft-07. Registering the
    /// same stream again replaces its schema; registering a different stream
    /// whose lookup key is already taken fails.
    pub fn register_value(&mut self, stream: StreamKey, schema: &Value) -> Result<()> {
        let key = stream.lookup_key();
        if let Some(existing) = self.schemas.get(&key) {
            if existing.stream != stream {
                return Err(SchemaError::StreamKeyCollision {
                    key,
                    existing: existing.stream.display_label(),
                    incoming: stream.display_label(),
                });
            }
        }

        let mut document = schema.clone();
        pin_dialect(&stream, &mut document)?;
        if self.config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator =
            jsonschema::validator_for(&document).map_err(|err| SchemaError::CompileFailed {
                stream: stream.display_label(),
                message: err.to_string(),
            })?;

        tracing::debug!(stream = %stream, key = %key, "registered stream schema");
        self.schemas.insert(
            key,
            StreamSchema {
                stream,
                document,
                validator,
            },
        );
        Ok(())
    }

    /// Load from embedded schema strings.
    pub fn from_embedded(schemas: &[(StreamKey, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (stream, schema) in schemas {
            registry.register(stream.clone(), schema)?;
        }
        Ok(registry)
    }

    /// Find the schema registered for `stream`.
    pub fn lookup(&self, stream: &StreamKey) -> Result<&StreamSchema> {
        let key = stream.lookup_key();
        match self.schemas.get(&key) {
            Some(schema) => Ok(schema),
            None => Err(SchemaError::UnknownStreamSchema { key }),
        }
    }

    /// Check if a stream has a registered schema.
    pub fn has_stream(&self, stream: &StreamKey) -> bool {
        self.schemas.contains_key(&stream.lookup_key())
    }

    /// Registered streams, ordered by lookup key.
    pub fn streams(&self) -> Vec<&StreamKey> {
        let mut entries: Vec<(&String, &StreamSchema)> = self.schemas.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, schema)| &schema.stream).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn pin_dialect(stream: &StreamKey, document: &mut Value) -> Result<()> {
    match document {
        Value::Object(map) => {
            map.insert(
                "$schema".to_string(),
                Value::String(DRAFT_07_SCHEMA_URI.to_string()),
            );
            Ok(())
        }
        other => Err(SchemaError::InvalidSchemaDocument {
            stream: stream.display_label(),
            reason: format!("expected a JSON object, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            recurse_object_schema_children(map);
        }
        Value::Array(items) => {
            for item in items {
                apply_strict_mode(item);
            }
        }
        _ => {}
    }
}

fn recurse_object_schema_children(map: &mut Map<String, Value>) {
    recurse_map_schemas(map, "properties");
    recurse_map_schemas(map, "patternProperties");
    recurse_map_schemas(map, "dependencies");
    recurse_map_schemas(map, "definitions");

    recurse_single_schema(map, "propertyNames");
    recurse_single_schema(map, "additionalProperties");
    recurse_single_schema(map, "items");
    recurse_single_schema(map, "contains");
    recurse_single_schema(map, "additionalItems");
    recurse_single_schema(map, "not");
    recurse_single_schema(map, "if");
    recurse_single_schema(map, "then");
    recurse_single_schema(map, "else");

    recurse_array_schemas(map, "allOf");
    recurse_array_schemas(map, "anyOf");
    recurse_array_schemas(map, "oneOf");
}

fn recurse_map_schemas(map: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Object(obj)) = map.get_mut(key) {
        for value in obj.values_mut() {
            apply_strict_mode(value);
        }
    }
}

fn recurse_single_schema(map: &mut Map<String, Value>, key: &str) {
    if let Some(value) = map.get_mut(key) {
        apply_strict_mode(value);
    }
}

fn recurse_array_schemas(map: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Array(items)) = map.get_mut(key) {
        for item in items {
            apply_strict_mode(item);
        }
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => is_object_keyword_schema(map),
    }
}

fn is_object_keyword_schema(map: &Map<String, Value>) -> bool {
    const OBJECT_KEYWORDS: [&str; 6] = [
        "properties",
        "patternProperties",
        "additionalProperties",
        "required",
        "dependencies",
        "propertyNames",
    ];

    OBJECT_KEYWORDS
        .iter()
        .any(|keyword| map.contains_key(*keyword))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const USERS_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string" }
        },
        "required": ["id", "name"]
    }"#;

    fn users() -> StreamKey {
        StreamKey::new(Some("public"), "users")
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(users(), USERS_SCHEMA).unwrap();

        let schema = registry.lookup(&users()).unwrap();
        assert_eq!(schema.stream(), &users());
        assert!(registry.has_stream(&users()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_of_unregistered_stream_is_unknown_schema() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.lookup(&StreamKey::named("orders")),
            Err(SchemaError::UnknownStreamSchema { ref key }) if key == "orders"
        ));
    }

    #[test]
    fn registration_pins_draft_07() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_value(
                users(),
                &json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "type": "object"
                }),
            )
            .unwrap();
        registry
            .register_value(StreamKey::named("orders"), &json!({ "type": "object" }))
            .unwrap();

        for stream in [users(), StreamKey::named("orders")] {
            let document = registry.lookup(&stream).unwrap().document();
            assert_eq!(document["$schema"], json!(DRAFT_07_SCHEMA_URI));
        }
    }

    #[test]
    fn registration_does_not_touch_caller_schema() {
        let schema = json!({ "type": "object" });
        let mut registry = SchemaRegistry::new();
        registry.register_value(users(), &schema).unwrap();
        assert!(schema.get("$schema").is_none());
    }

    #[test]
    fn non_object_schema_is_invalid_document() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register_value(users(), &json!(true)),
            Err(SchemaError::InvalidSchemaDocument { ref stream, .. }) if stream == "public-users"
        ));
        assert!(matches!(
            registry.register(users(), "[1, 2]"),
            Err(SchemaError::InvalidSchemaDocument { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_schema_fails_compile() {
        let mut registry = SchemaRegistry::new();
        let invalid = r#"{"type":"definitely-not-a-type"}"#;

        assert!(matches!(
            registry.register(users(), invalid),
            Err(SchemaError::CompileFailed { .. })
        ));
    }

    #[test]
    fn invalid_json_fails() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register(users(), "not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn distinct_streams_with_same_lookup_key_collide() {
        let mut registry = SchemaRegistry::new();
        registry.register(users(), USERS_SCHEMA).unwrap();

        let result = registry.register(StreamKey::named("publicusers"), USERS_SCHEMA);
        assert!(matches!(
            result,
            Err(SchemaError::StreamKeyCollision { ref key, ref existing, ref incoming })
                if key == "publicusers" && existing == "public-users" && incoming == "publicusers"
        ));

        let result = registry.register(StreamKey::new(Some("pub"), "licusers"), USERS_SCHEMA);
        assert!(matches!(result, Err(SchemaError::StreamKeyCollision { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_same_stream_replaces_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register(users(), USERS_SCHEMA).unwrap();
        registry
            .register(users(), r#"{"type":"object","properties":{}}"#)
            .unwrap();

        assert_eq!(registry.len(), 1);
        let document = registry.lookup(&users()).unwrap().document();
        assert!(document.get("required").is_none());
    }

    #[test]
    fn from_embedded_and_sorted_streams() {
        let registry = SchemaRegistry::from_embedded(&[
            (StreamKey::named("orders"), USERS_SCHEMA),
            (users(), USERS_SCHEMA),
            (StreamKey::new(Some("audit"), "events"), USERS_SCHEMA),
        ])
        .unwrap();

        let keys: Vec<String> = registry.streams().iter().map(|s| s.lookup_key()).collect();
        assert_eq!(keys, vec!["auditevents", "orders", "publicusers"]);
    }

    #[test]
    fn strict_mode_sets_additional_properties_recursively() {
        let mut strict = SchemaRegistry::with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        strict
            .register_value(
                users(),
                &json!({
                    "type": "object",
                    "properties": {
                        "address": {
                            "properties": { "city": { "type": "string" } }
                        },
                        "tags": { "type": "array", "items": { "type": "string" } }
                    }
                }),
            )
            .unwrap();

        let document = strict.lookup(&users()).unwrap().document();
        assert_eq!(document["additionalProperties"], json!(false));
        assert_eq!(
            document["properties"]["address"]["additionalProperties"],
            json!(false)
        );
        assert!(document["properties"]["tags"]
            .get("additionalProperties")
            .is_none());
    }

    #[test]
    fn strict_mode_keeps_explicit_additional_properties() {
        let mut strict = SchemaRegistry::with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        strict
            .register_value(
                users(),
                &json!({ "type": "object", "additionalProperties": true }),
            )
            .unwrap();

        let document = strict.lookup(&users()).unwrap().document();
        assert_eq!(document["additionalProperties"], json!(true));
    }

    #[test]
    fn config_access() {
        let config = RegistryConfig {
            strict_mode: true,
            max_streams: 4,
            max_catalog_file_size: 1024,
        };
        let registry = SchemaRegistry::with_config(config);
        assert_eq!(registry.config(), &config);
    }
}

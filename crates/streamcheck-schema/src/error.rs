/// Errors raised while building the schema registry or validating records.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The record payload does not match its stream's schema.
    #[error("{message}")]
    RecordNonconforming { stream: String, message: String },

    /// No schema is registered under the record's resolved stream key.
    #[error("no schema registered for stream key {key:?}")]
    UnknownStreamSchema { key: String },

    /// The schema document cannot carry a dialect declaration.
    #[error("invalid schema document for stream {stream}: {reason}")]
    InvalidSchemaDocument { stream: String, reason: String },

    /// The schema could not be compiled.
    #[error("failed to compile schema for stream {stream}: {message}")]
    CompileFailed { stream: String, message: String },

    /// Two distinct streams resolve to the same lookup key.
    #[error("stream {incoming} resolves to key {key:?} already used by stream {existing}")]
    StreamKeyCollision {
        key: String,
        existing: String,
        incoming: String,
    },

    /// The catalog could not be loaded.
    #[error("failed to load catalog: {0}")]
    LoadFailed(String),

    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl SchemaError {
    /// True for failures caused by registry or catalog wiring rather than by
    /// record data.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            SchemaError::UnknownStreamSchema { .. }
                | SchemaError::InvalidSchemaDocument { .. }
                | SchemaError::CompileFailed { .. }
                | SchemaError::StreamKeyCollision { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonconforming_displays_message_verbatim() {
        let err = SchemaError::RecordNonconforming {
            stream: "users".to_string(),
            message: "Record schema validation failed for users. Expected age to be number. "
                .to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Record schema validation failed for users. Expected age to be number. "
        );
        assert!(!err.is_integrity_failure());
    }

    #[test]
    fn wiring_errors_are_integrity_failures() {
        assert!(SchemaError::UnknownStreamSchema {
            key: "orders".to_string()
        }
        .is_integrity_failure());
        assert!(SchemaError::InvalidSchemaDocument {
            stream: "orders".to_string(),
            reason: "not an object".to_string(),
        }
        .is_integrity_failure());
        assert!(!SchemaError::LoadFailed("io".to_string()).is_integrity_failure());
    }
}

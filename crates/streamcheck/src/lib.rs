//! Validate pipeline records against the JSON Schema their stream declares.
//!
//! # Crate Structure
//!
//! - [`schema`] — Stream keys, schema registry, catalog loading and the
//!   per-record validator
//!
//! The `streamcheck` binary (behind the `cli` feature) validates a file of
//! record messages against a configured catalog.

/// Re-export schema validation types.
pub mod schema {
    pub use streamcheck_schema::*;
}

pub use streamcheck_schema::{
    Record, SchemaError, SchemaRegistry, StreamKey, StreamSchemaValidator, ValidationOutcome,
};

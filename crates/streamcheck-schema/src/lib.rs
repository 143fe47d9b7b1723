//! Per-stream JSON Schema validation of pipeline records.
//!
//! Every record produced by a source belongs to a stream, identified by an
//! optional namespace and a name. The catalog promises one JSON Schema per
//! stream; this crate checks each record's payload against that schema and
//! turns engine errors into a single field-level diagnostic the caller can
//! attribute to the stream.
//!
//! All schemas are pinned to JSON Schema Draft-07 when they are registered,
//! whatever dialect the connector authored them in.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod stream;
pub mod validator;

pub use catalog::{load_catalog, CatalogStream, ConfiguredCatalog, ConfiguredStream};
pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use matcher::{PathSegment, Violation};
pub use registry::{SchemaRegistry, StreamSchema, DRAFT_07_SCHEMA_URI};
pub use stream::{stream_lookup_key, Record, StreamKey};
pub use validator::{format_diagnostic, Nonconformance, StreamSchemaValidator, ValidationOutcome};

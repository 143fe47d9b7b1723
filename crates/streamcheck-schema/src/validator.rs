use std::sync::Arc;

use crate::error::{Result, SchemaError};
use crate::matcher::{collect_violations, Violation};
use crate::registry::SchemaRegistry;
use crate::stream::Record;

/// Details of a record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonconformance {
    /// Display label of the record's stream.
    pub stream: String,
    /// Full diagnostic, one sentence per violation.
    pub message: String,
    pub violations: Vec<Violation>,
}

/// Result of checking one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Conforms,
    Nonconforms(Nonconformance),
}

impl ValidationOutcome {
    pub fn is_conforming(&self) -> bool {
        matches!(self, ValidationOutcome::Conforms)
    }

    /// Turn a nonconforming outcome into [`SchemaError::RecordNonconforming`].
    pub fn into_result(self) -> Result<()> {
        match self {
            ValidationOutcome::Conforms => Ok(()),
            ValidationOutcome::Nonconforms(Nonconformance {
                stream, message, ..
            }) => Err(SchemaError::RecordNonconforming { stream, message }),
        }
    }
}

/// Build the diagnostic reported for a nonconforming record.
///
/// Produces `Record schema validation failed for <label>. ` followed by
/// `Expected <path> to be <expected>. ` for each violation, in order.
pub fn format_diagnostic(label: &str, violations: &[Violation]) -> String {
    let details: String = violations
        .iter()
        .map(|violation| {
            format!(
                "Expected {} to be {}. ",
                violation.path_display(),
                violation.expected
            )
        })
        .collect();
    format!("Record schema validation failed for {label}. {details}")
}

/// Checks records against the schema registered for their stream.
#[derive(Clone)]
pub struct StreamSchemaValidator {
    registry: Arc<SchemaRegistry>,
}

impl StreamSchemaValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate a record's payload against its stream's schema.
    ///
    /// A payload that does not match is reported as
    /// [`ValidationOutcome::Nonconforms`]; errors are reserved for registry
    /// wiring problems such as an unregistered stream.
    pub fn validate(&self, record: &Record) -> Result<ValidationOutcome> {
        let stream = record.key();
        let schema = self.registry.lookup(&stream)?;

        let violations = collect_violations(schema.validator(), &record.data);
        if violations.is_empty() {
            tracing::trace!(stream = %stream, "record conforms");
            return Ok(ValidationOutcome::Conforms);
        }

        let label = stream.display_label();
        let message = format_diagnostic(&label, &violations);
        tracing::trace!(stream = %stream, violations = violations.len(), "record nonconforming");
        Ok(ValidationOutcome::Nonconforms(Nonconformance {
            stream: label,
            message,
            violations,
        }))
    }

    /// Like [`validate`](Self::validate), but a nonconforming record is an
    /// error.
    pub fn ensure(&self, record: &Record) -> Result<()> {
        self.validate(record)?.into_result()
    }
}

use std::fmt;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::Validator;
use serde_json::Value;

/// One step into a record's data tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Quoted so `a.b` cannot be confused with `a` then `b`.
            PathSegment::Property(name) if name.contains('.') => write!(f, "{name:?}"),
            PathSegment::Property(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single location in the record that does not satisfy the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    /// Expected type, or a description of the failed constraint.
    pub expected: String,
}

impl Violation {
    pub fn new(path: Vec<PathSegment>, expected: impl Into<String>) -> Self {
        Self {
            path,
            expected: expected.into(),
        }
    }

    /// Dotted path to the offending value; `$` for the record root.
    /// Property names containing `.` are rendered quoted.
    pub fn path_display(&self) -> String {
        if self.path.is_empty() {
            return "$".to_string();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Run the compiled schema over `data` and report every violation in the
/// order the engine yields them.
pub(crate) fn collect_violations(validator: &Validator, data: &Value) -> Vec<Violation> {
    validator
        .iter_errors(data)
        .map(|err| {
            let path = split_instance_path(err.instance_path().as_str(), data);
            let expected = expected_type(err.kind()).unwrap_or_else(|| err.to_string());
            Violation { path, expected }
        })
        .collect()
}

fn split_instance_path(pointer: &str, data: &Value) -> Vec<PathSegment> {
    let mut current = Some(data);
    let mut segments = Vec::new();

    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        let segment = match (current, token.parse::<usize>()) {
            (Some(Value::Array(items)), Ok(index)) => {
                current = items.get(index);
                PathSegment::Index(index)
            }
            (Some(Value::Object(map)), _) => {
                current = map.get(&token);
                PathSegment::Property(token)
            }
            _ => {
                current = None;
                PathSegment::Property(token)
            }
        };
        segments.push(segment);
    }

    segments
}

/// For `type` failures, the type(s) the schema declares.
fn expected_type(kind: &ValidationErrorKind) -> Option<String> {
    match kind {
        ValidationErrorKind::Type {
            kind: TypeKind::Single(primitive),
        } => Some(primitive.to_string()),
        ValidationErrorKind::Type {
            kind: TypeKind::Multiple(primitives),
        } => {
            let names: Vec<String> = (*primitives).into_iter().map(|p| p.to_string()).collect();
            Some(names.join(" or "))
        }
        _ => None,
    }
}

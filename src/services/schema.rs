//! Declared shapes for filter inputs and query outputs.
//!
//! The entry shape lives on [`ClientFilter`] as validator attributes. The
//! return shapes are plain records checked against the JSON envelope built
//! from executor rows, before anything is decoded or forwarded.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::forms::filter::ClientFilter;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Every check that failed for one candidate value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaViolations(Vec<Violation>);

impl SchemaViolations {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            path: path.into(),
            message: message.into(),
        }])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), SchemaViolations> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for SchemaViolations {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.path, v.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

impl From<ValidationErrors> for SchemaViolations {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut violations = SchemaViolations::default();
        for (field, errors) in fields {
            for error in errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("does not match the `{}` pattern", error.code));
                violations.push(field.to_string(), message);
            }
        }
        violations
    }
}

/// Checks the entry shape: `None` or an object whose present fields match.
pub fn validate_entry(filter: Option<&ClientFilter>) -> Result<(), SchemaViolations> {
    match filter {
        Some(filter) => filter.validate().map_err(SchemaViolations::from),
        None => Ok(()),
    }
}

/// Shape of a result envelope `{ total, <rows_field>: [...] }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnShape {
    pub rows_field: &'static str,
    pub rows_are_objects: bool,
}

/// `{ total: integer, content: [object] }`
pub const RETURN_CONTENT: ReturnShape = ReturnShape {
    rows_field: "content",
    rows_are_objects: true,
};

/// `{ total: integer, id_client: [] }`
pub const RETURN_IDS: ReturnShape = ReturnShape {
    rows_field: "id_client",
    rows_are_objects: false,
};

/// Checks a result envelope against `shape`.
pub fn validate_return(shape: &ReturnShape, value: &Value) -> Result<(), SchemaViolations> {
    let mut violations = SchemaViolations::default();

    let Some(object) = value.as_object() else {
        violations.push("", "expected an object");
        return violations.into_result();
    };

    match object.get("total") {
        Some(total) if total.is_i64() || total.is_u64() => {}
        Some(_) => violations.push("total", "expected an integer"),
        None => violations.push("total", "is required"),
    }

    match object.get(shape.rows_field) {
        Some(Value::Array(items)) => {
            if shape.rows_are_objects {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        violations.push(format!("{}[{i}]", shape.rows_field), "expected an object");
                    }
                }
            }
        }
        Some(_) => violations.push(shape.rows_field, "expected an array"),
        None => violations.push(shape.rows_field, "is required"),
    }

    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_entry_is_valid() {
        assert!(validate_entry(None).is_ok());
    }

    #[test]
    fn entry_violations_name_the_field() {
        let filter = ClientFilter {
            name: Some("!!".into()),
            id_parent: Some("x".into()),
            ..ClientFilter::default()
        };

        let violations = validate_entry(Some(&filter)).unwrap_err();
        let paths: Vec<&str> = violations
            .violations()
            .iter()
            .map(|v| v.path.as_str())
            .collect();

        assert!(paths.contains(&"id_parent"));
        assert!(paths.contains(&"name"));
    }

    #[test]
    fn content_shape_accepts_objects() {
        let value = json!({"total": 1, "content": [{"id_client": 1}]});
        assert!(validate_return(&RETURN_CONTENT, &value).is_ok());
    }

    #[test]
    fn content_shape_rejects_scalar_rows_and_missing_total() {
        let value = json!({"content": [1, {"id_client": 1}]});

        let violations = validate_return(&RETURN_CONTENT, &value).unwrap_err();

        assert_eq!(
            violations.violations(),
            &[
                Violation {
                    path: "total".into(),
                    message: "is required".into()
                },
                Violation {
                    path: "content[0]".into(),
                    message: "expected an object".into()
                },
            ]
        );
    }

    #[test]
    fn ids_shape_requires_an_array() {
        assert!(validate_return(&RETURN_IDS, &json!({"total": 2, "id_client": [1, 2]})).is_ok());

        let violations =
            validate_return(&RETURN_IDS, &json!({"total": "2", "id_client": {}})).unwrap_err();
        assert_eq!(violations.violations().len(), 2);
        assert_eq!(
            violations.to_string(),
            "total: expected an integer; id_client: expected an array"
        );
    }

    #[test]
    fn non_object_envelope_is_rejected() {
        assert!(validate_return(&RETURN_CONTENT, &json!([])).is_err());
    }
}

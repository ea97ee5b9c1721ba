//! Descriptive payload schemas and boundary validation.
//!
//! Every queue in the catalog maps to exactly one [`PayloadSchema`]. The
//! schema is pure shape metadata - field names, value kinds, nullability -
//! with no behavior beyond [`PayloadSchema::validate`], which the producer
//! runs on dynamically-shaped submissions *before* anything reaches the
//! backend.
//!
//! # Validation Rules
//!
//! - The payload must be a JSON object.
//! - Required fields must be present and non-null with a matching kind.
//! - Optional fields may be absent or null; when present they must match.
//! - Unknown fields are rejected, at the top level and inside nested
//!   records. The raw path exists for boundary inputs (webhooks); dropping
//!   unrecognized fields would mask producer bugs the typed path catches at
//!   compile time.
//!
//! Statically-typed submissions go through the same check, so the schema
//! statics and the Rust payload types can never drift apart silently.

use serde_json::Value;
use thiserror::Error;

/// Shape metadata for one queue's payload.
///
/// Schemas are `'static` data registered in the catalog. Two queues never
/// share a schema value, even when the shapes are structurally identical:
/// queue identity carries processing semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSchema {
    /// The payload type this schema describes (e.g. `ReactionNotificationJobData`).
    pub name: &'static str,
    /// Declared fields, in declaration order.
    pub fields: &'static [FieldSpec],
}

/// One declared field of a payload schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field (camelCase for catalog payloads).
    pub name: &'static str,
    /// The value domain this field accepts.
    pub kind: FieldKind,
    /// Required fields must be present and non-null.
    pub required: bool,
}

/// Value domains a schema field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    Text,
    /// A JSON integer.
    Integer,
    /// Any JSON number.
    Float,
    /// A JSON boolean.
    Boolean,
    /// Either epoch milliseconds or an RFC 3339 string.
    Timestamp,
    /// An entity referenced by its id string.
    Reference,
    /// A nested record validated against its own schema.
    Record(&'static PayloadSchema),
}

impl FieldKind {
    /// Human-readable name for diagnostics.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Float => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::Timestamp => "epoch milliseconds or an RFC 3339 string",
            FieldKind::Reference => "an id string",
            FieldKind::Record(_) => "a nested record",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text | FieldKind::Reference => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Timestamp => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
                _ => false,
            },
            FieldKind::Record(_) => value.is_object(),
        }
    }
}

/// A payload rejected by schema validation.
///
/// Surfaced to the producer caller immediately; never retried, never sent to
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// The payload root (or a nested record) was not a JSON object.
    #[error("{schema} expects a JSON object, got {found}")]
    NotAnObject {
        /// Schema that rejected the value.
        schema: &'static str,
        /// JSON kind actually found.
        found: &'static str,
    },

    /// A required field was absent or null.
    #[error("{schema} is missing required field `{field}`")]
    MissingField {
        /// Schema that rejected the value.
        schema: &'static str,
        /// The absent field.
        field: &'static str,
    },

    /// A field was present with the wrong value kind.
    #[error("field `{field}` of {schema} expects {expected}, got {found}")]
    WrongKind {
        /// Schema that rejected the value.
        schema: &'static str,
        /// The offending field.
        field: &'static str,
        /// What the schema declares.
        expected: &'static str,
        /// JSON kind actually found.
        found: &'static str,
    },

    /// A field not declared by the schema.
    #[error("{schema} does not declare field `{field}`")]
    UnknownField {
        /// Schema that rejected the value.
        schema: &'static str,
        /// The undeclared field name.
        field: String,
    },

    /// A typed payload failed JSON serialization. Indicates a bug in the
    /// payload type itself, not in caller data.
    #[error("{schema} payload could not be serialized: {message}")]
    Unserializable {
        /// Schema the payload belongs to.
        schema: &'static str,
        /// The serializer's error text.
        message: String,
    },
}

impl PayloadSchema {
    /// Validate a JSON value against this schema.
    ///
    /// Returns the first violation encountered; field order follows the
    /// schema declaration, then unknown-field detection.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(SchemaViolation::NotAnObject {
                    schema: self.name,
                    found: json_kind(other),
                })
            }
        };

        for field in self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(SchemaViolation::MissingField {
                            schema: self.name,
                            field: field.name,
                        });
                    }
                }
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(SchemaViolation::WrongKind {
                            schema: self.name,
                            field: field.name,
                            expected: field.kind.expected(),
                            found: json_kind(value),
                        });
                    }
                    if let FieldKind::Record(nested) = field.kind {
                        nested.validate(value)?;
                    }
                }
            }
        }

        for key in object.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                return Err(SchemaViolation::UnknownField {
                    schema: self.name,
                    field: key.clone(),
                });
            }
        }

        Ok(())
    }

    /// Look up a declared field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static NESTED: PayloadSchema = PayloadSchema {
        name: "NestedRecord",
        fields: &[
            FieldSpec {
                name: "id",
                kind: FieldKind::Reference,
                required: true,
            },
            FieldSpec {
                name: "count",
                kind: FieldKind::Integer,
                required: false,
            },
        ],
    };

    static SCHEMA: PayloadSchema = PayloadSchema {
        name: "TestPayload",
        fields: &[
            FieldSpec {
                name: "userId",
                kind: FieldKind::Reference,
                required: true,
            },
            FieldSpec {
                name: "note",
                kind: FieldKind::Text,
                required: false,
            },
            FieldSpec {
                name: "seenAt",
                kind: FieldKind::Timestamp,
                required: false,
            },
            FieldSpec {
                name: "nested",
                kind: FieldKind::Record(&NESTED),
                required: false,
            },
        ],
    };

    #[test]
    fn test_valid_payload() {
        let value = json!({ "userId": "u1", "note": "hello" });
        assert!(SCHEMA.validate(&value).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let value = json!({ "note": "hello" });
        assert_eq!(
            SCHEMA.validate(&value),
            Err(SchemaViolation::MissingField {
                schema: "TestPayload",
                field: "userId",
            })
        );
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let value = json!({ "userId": null });
        assert!(matches!(
            SCHEMA.validate(&value),
            Err(SchemaViolation::MissingField { field: "userId", .. })
        ));
    }

    #[test]
    fn test_null_optional_field_is_fine() {
        let value = json!({ "userId": "u1", "note": null });
        assert!(SCHEMA.validate(&value).is_ok());
    }

    #[test]
    fn test_wrong_kind() {
        let value = json!({ "userId": 42 });
        let err = SCHEMA.validate(&value).unwrap_err();
        assert!(matches!(
            err,
            SchemaViolation::WrongKind { field: "userId", .. }
        ));
        assert!(err.to_string().contains("id string"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let value = json!({ "userId": "u1", "extra": true });
        assert_eq!(
            SCHEMA.validate(&value),
            Err(SchemaViolation::UnknownField {
                schema: "TestPayload",
                field: "extra".to_string(),
            })
        );
    }

    #[test]
    fn test_not_an_object() {
        let err = SCHEMA.validate(&json!("just a string")).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NotAnObject {
                schema: "TestPayload",
                found: "a string",
            }
        );
    }

    #[test]
    fn test_timestamp_accepts_epoch_millis() {
        let value = json!({ "userId": "u1", "seenAt": 1_712_000_000_000_i64 });
        assert!(SCHEMA.validate(&value).is_ok());
    }

    #[test]
    fn test_timestamp_accepts_rfc3339() {
        let value = json!({ "userId": "u1", "seenAt": "2020-01-01T00:00:00Z" });
        assert!(SCHEMA.validate(&value).is_ok());
    }

    #[test]
    fn test_timestamp_rejects_arbitrary_string() {
        let value = json!({ "userId": "u1", "seenAt": "yesterday" });
        assert!(matches!(
            SCHEMA.validate(&value),
            Err(SchemaViolation::WrongKind { field: "seenAt", .. })
        ));
    }

    #[test]
    fn test_nested_record_validated() {
        let ok = json!({ "userId": "u1", "nested": { "id": "n1", "count": 2 } });
        assert!(SCHEMA.validate(&ok).is_ok());

        let missing = json!({ "userId": "u1", "nested": { "count": 2 } });
        assert!(matches!(
            SCHEMA.validate(&missing),
            Err(SchemaViolation::MissingField {
                schema: "NestedRecord",
                field: "id",
            })
        ));

        let unknown = json!({ "userId": "u1", "nested": { "id": "n1", "other": 1 } });
        assert!(matches!(
            SCHEMA.validate(&unknown),
            Err(SchemaViolation::UnknownField { schema: "NestedRecord", .. })
        ));
    }

    #[test]
    fn test_field_lookup() {
        assert!(SCHEMA.field("userId").is_some());
        assert!(SCHEMA.field("missing").is_none());
        assert!(SCHEMA.field("userId").unwrap().required);
    }

    #[test]
    fn test_violation_display() {
        let err = SchemaViolation::MissingField {
            schema: "TestPayload",
            field: "userId",
        };
        assert_eq!(
            err.to_string(),
            "TestPayload is missing required field `userId`"
        );
    }
}

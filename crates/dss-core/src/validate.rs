use crate::frontmatter::Frontmatter;
use crate::types::{describe, FieldValue, RequiredField};
use serde::Serialize;
use thiserror::Error;

/// A problem found in one file. Collected into the file's report; never
/// aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("No frontmatter found")]
    MissingFrontmatter,

    #[error("Malformed YAML in frontmatter: {message}")]
    MalformedYaml { message: String },

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: RequiredField },

    #[error("Invalid type for {field}: {detail}")]
    InvalidFieldType { field: RequiredField, detail: String },

    #[error("Could not read file: {message}")]
    Unreadable { message: String },

    #[error("Could not render corrected frontmatter: {message}")]
    RenderFailed { message: String },

    #[error("Could not write file: {message}")]
    WriteFailed { message: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingFrontmatter => "missing_frontmatter",
            ValidationError::MalformedYaml { .. } => "malformed_yaml",
            ValidationError::MissingRequiredField { .. } => "missing_required_field",
            ValidationError::InvalidFieldType { .. } => "invalid_field_type",
            ValidationError::Unreadable { .. } => "unreadable",
            ValidationError::RenderFailed { .. } => "render_failed",
            ValidationError::WriteFailed { .. } => "write_failed",
        }
    }
}

/// Check the required fields of `frontmatter`. Pure; an empty result means
/// the frontmatter is valid.
pub fn validate(frontmatter: &Frontmatter) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for &field in RequiredField::all() {
        match frontmatter.field(field) {
            None => errors.push(ValidationError::MissingRequiredField { field }),
            Some(FieldValue::Text(s)) => errors.push(ValidationError::InvalidFieldType {
                field,
                detail: format!("expected a list, found a string ({s:?})"),
            }),
            Some(FieldValue::Other(value)) => errors.push(ValidationError::InvalidFieldType {
                field,
                detail: format!("expected a list, found {}", describe(&value)),
            }),
            Some(FieldValue::List { non_strings, .. }) => {
                for item in &non_strings {
                    errors.push(ValidationError::InvalidFieldType {
                        field,
                        detail: format!("list item must be a string, found {}", describe(item)),
                    });
                }
            }
        }
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse;

    #[test]
    fn valid_frontmatter_has_no_errors() {
        let fm = parse("tags: [test, validation]\nprovides: [test_data]\nrequires: []").unwrap();
        assert!(validate(&fm).is_empty());
    }

    #[test]
    fn missing_fields_are_named() {
        let fm = parse("tags: [test]").unwrap();
        let errors = validate(&fm);
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingRequiredField {
                    field: RequiredField::Provides
                },
                ValidationError::MissingRequiredField {
                    field: RequiredField::Requires
                },
            ]
        );
        assert_eq!(errors[0].to_string(), "Missing required field: provides");
    }

    #[test]
    fn non_list_values_are_type_errors() {
        let fm = parse("tags: test\nprovides: 123\nrequires: {key: value}").unwrap();
        let errors = validate(&fm);
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::InvalidFieldType { .. })));
        assert_eq!(
            errors[1].to_string(),
            "Invalid type for provides: expected a list, found a number (123)"
        );
    }

    #[test]
    fn each_non_string_item_is_reported() {
        let fm = parse("tags: [doc, 123, code, true]\nprovides: []\nrequires: []").unwrap();
        let errors = validate(&fm);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("list item must be a string"));
        assert_eq!(errors[0].kind(), "invalid_field_type");
    }

    #[test]
    fn empty_mapping_misses_everything() {
        let errors = validate(&Frontmatter::new());
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.kind() == "missing_required_field"));
    }

    #[test]
    fn null_value_is_a_type_error() {
        let fm = parse("tags:\nprovides: []\nrequires: []").unwrap();
        let errors = validate(&fm);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().ends_with("found null"));
    }

    #[test]
    fn errors_serialize_with_kind_tag() {
        let err = ValidationError::MissingRequiredField {
            field: RequiredField::Tags,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "missing_required_field");
        assert_eq!(json["field"], "tags");
    }
}

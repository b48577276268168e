//! # Creation Input Validation
//!
//! Rules applied to a create payload before it reaches the service:
//!
//! - `Name` must not be blank
//! - `Pib` must not be blank and must be exactly 9 characters long
//! - `MaticniBroj` must not be blank and must be exactly 8 characters long
//!
//! Every rule is evaluated; a field can collect more than one message. Absent fields
//! are validated as empty text.
//!
//! ```rust
//! use companies::{CompanyPatch, validate_create};
//!
//! let errors = validate_create(&CompanyPatch::default()).unwrap_err();
//! assert_eq!(errors.messages("Name"), ["Company name is required"]);
//! assert!(errors.messages("Pib").contains(&"'Pib' must not be empty.".to_string()));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CompanyPatch;
use crate::field_walk::is_not_blank;

/// Title reported with every validation failure.
pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// Expected length of a tax identifier.
pub const PIB_LENGTH: usize = 9;

/// Expected length of a registration number.
pub const MATICNI_BROJ_LENGTH: usize = 8;

/// Validation failures keyed by the offending field's wire name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns true when no rule failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for `field`, in rule order.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All failures keyed by field.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", VALIDATION_TITLE)?;
        for (field, messages) in &self.errors {
            write!(f, " {}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Problem document returned to HTTP callers when validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblem {
    /// Always [`VALIDATION_TITLE`].
    pub title: String,
    /// HTTP status code, always 400.
    pub status: u16,
    /// Failures keyed by field.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl From<ValidationErrors> for ValidationProblem {
    fn from(errors: ValidationErrors) -> Self {
        ValidationProblem {
            title: VALIDATION_TITLE.to_string(),
            status: 400,
            errors: errors.errors,
        }
    }
}

/// Validates a create payload.
pub fn validate_create(patch: &CompanyPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = patch.name.as_deref().unwrap_or_default();
    if !is_not_blank(name) {
        errors.add("Name", "Company name is required");
    }

    check_code(
        &mut errors,
        "Pib",
        "'Pib' must not be empty.",
        patch.pib.as_deref().unwrap_or_default(),
        PIB_LENGTH,
        "Pib must be 9 characters long.",
    );

    check_code(
        &mut errors,
        "MaticniBroj",
        "'Maticni Broj' must not be empty.",
        patch.maticni_broj.as_deref().unwrap_or_default(),
        MATICNI_BROJ_LENGTH,
        "Maticni broj must be 8 characters long.",
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_code(
    errors: &mut ValidationErrors,
    field: &str,
    empty_message: &str,
    value: &str,
    length: usize,
    length_message: &str,
) {
    if !is_not_blank(value) {
        errors.add(field, empty_message);
    }
    if value.chars().count() != length {
        errors.add(field, length_message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_patch() -> CompanyPatch {
        CompanyPatch {
            name: Some("New Company".to_string()),
            street: Some("123 Test Street".to_string()),
            pib: Some("123456789".to_string()),
            maticni_broj: Some("12345678".to_string()),
            ..CompanyPatch::default()
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert_eq!(validate_create(&valid_patch()), Ok(()));
    }

    #[test]
    fn empty_payload_reports_every_rule() {
        let errors = validate_create(&CompanyPatch::default()).unwrap_err();
        assert_eq!(errors.messages("Name"), ["Company name is required"]);
        assert_eq!(
            errors.messages("Pib"),
            ["'Pib' must not be empty.", "Pib must be 9 characters long."]
        );
        assert_eq!(
            errors.messages("MaticniBroj"),
            [
                "'Maticni Broj' must not be empty.",
                "Maticni broj must be 8 characters long."
            ]
        );
    }

    #[test]
    fn whitespace_name_is_blank() {
        let patch = CompanyPatch {
            name: Some(" \t ".to_string()),
            ..valid_patch()
        };
        let errors = validate_create(&patch).unwrap_err();
        assert_eq!(errors.messages("Name"), ["Company name is required"]);
        assert!(errors.messages("Pib").is_empty());
    }

    #[test]
    fn wrong_lengths_are_reported() {
        let patch = CompanyPatch {
            pib: Some("12345678".to_string()),
            maticni_broj: Some("123456789".to_string()),
            ..valid_patch()
        };
        let errors = validate_create(&patch).unwrap_err();
        assert_eq!(errors.messages("Pib"), ["Pib must be 9 characters long."]);
        assert_eq!(
            errors.messages("MaticniBroj"),
            ["Maticni broj must be 8 characters long."]
        );
        assert!(errors.messages("Name").is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let patch = CompanyPatch {
            pib: Some("ččččččččč".to_string()),
            ..valid_patch()
        };
        assert_eq!(validate_create(&patch), Ok(()));
    }

    #[test]
    fn blank_code_of_right_length_is_still_empty() {
        let patch = CompanyPatch {
            pib: Some(" ".repeat(PIB_LENGTH)),
            ..valid_patch()
        };
        let errors = validate_create(&patch).unwrap_err();
        assert_eq!(errors.messages("Pib"), ["'Pib' must not be empty."]);
    }

    #[test]
    fn problem_document_shape() {
        let errors = validate_create(&CompanyPatch::default()).unwrap_err();
        let problem = ValidationProblem::from(errors);
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["title"], VALIDATION_TITLE);
        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"]["Name"][0], "Company name is required");
    }
}

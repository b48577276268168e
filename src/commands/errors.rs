//! # Command Error Handling
//!
//! This module provides error handling utilities for companyctl commands using the
//! handled crate for consistent error property extraction.

use handled::Handle;

use crate::http_utils::HttpError;
use crate::{CompanyIdParseError, MergeStrategyParseError};

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Implements Handle<UserError> for itself to allow extraction
impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

impl Handle<UserError> for CompanyIdParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some("Company IDs are positive integers, e.g. 42".to_string()),
        })
    }
}

impl Handle<UserError> for MergeStrategyParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: self.to_string(),
            usage_hint: Some(
                "Use 'field-walk' (the default) or 'mapping' as the merge strategy".to_string(),
            ),
        })
    }
}

impl Handle<UserError> for serde_yml::Error {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("Company data parsing error: {}", self),
            usage_hint: Some(
                "Pass company data as JSON or YAML, e.g. '{\"name\": \"Company A\", \"pib\": \"123456789\"}'"
                    .to_string(),
            ),
        })
    }
}

impl Handle<UserError> for HttpError {
    fn handle(&self) -> Option<UserError> {
        let usage_hint = match self.status() {
            Some(404) => Some(
                "The requested company was not found. Check the ID and try again.".to_string(),
            ),
            Some(400) => Some("Invalid request. Check your input data and try again.".to_string()),
            Some(500..=599) => {
                Some("Server error. The service may be temporarily unavailable.".to_string())
            }
            None => Some("Check that companiesd is running and --base-url is correct.".to_string()),
            _ => None,
        };

        Some(UserError {
            message: self.to_string(),
            usage_hint,
        })
    }
}

/// Enhanced error formatting for CLI output
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        let mut output = format!("Error: {}", user_error.message);
        if let Some(hint) = user_error.usage_hint {
            output.push_str(&format!("\nHint: {}", hint));
        }
        output
    } else {
        format!("Error: {}", error)
    }
}

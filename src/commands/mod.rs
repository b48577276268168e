//! # Command Handlers
//!
//! This module contains the command handlers for the companyctl CLI application.
//!
//! ## Structure
//!
//! - `company` - Company management commands (list, get, create, patch, replace, delete)
//! - `errors` - User-facing error extraction through the handled crate
//! - `shared` - Shared utilities and validation functions

pub mod company;
pub mod errors;
pub mod shared;

pub use company::handle_company_command;

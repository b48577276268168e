//! # Companies: a CRUD HTTP service for company records
//!
//! This crate stores company records (name, address, tax identifier, registration
//! number, active flag) and serves them over a small REST API. Its core is the
//! partial-update merge: a sparse [`CompanyPatch`] is applied to a stored [`Company`]
//! so that only meaningfully-set fields change.
//!
//! - **Merging**: two interchangeable strategies behind the [`Merger`] trait. The
//!   field-walk strategy uses code generated by `#[derive(companies_derive::FieldWalk)]`
//!   to visit fields by name; the mapping strategy evaluates the static
//!   [`COMPANY_MAPPING`] rule table. Both always agree.
//! - **Service**: [`CompanyService`] lists, gets, creates, deletes, merges and replaces
//!   companies on top of any [`CompanyStore`].
//! - **Storage**: [`InMemoryCompanyStore`] for tests and quick starts,
//!   [`sql::PgCompanyStore`] for PostgreSQL.
//! - **HTTP API**: [`create_company_router`] exposes the service under `/company`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├─────────────────────────────────────────┤
//! │ Company Service                         │
//! ├──────────────────────┬──────────────────┤
//! │ Mergers              │                  │
//! │ (field walk/mapping) │                  │
//! ├──────────────────────┴──────────────────┤
//! │ Company Store (in-memory or PostgreSQL) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Merging a Patch
//!
//! ```rust
//! use companies::{Company, CompanyId, CompanyPatch, MergeStrategy};
//!
//! let stored = Company {
//!     id: CompanyId::new(1),
//!     name: "Company A".to_string(),
//!     city: "Beograd".to_string(),
//!     ..Company::default()
//! };
//! let patch = CompanyPatch {
//!     name: Some("".to_string()),
//!     city: Some("Novi Sad".to_string()),
//!     ..CompanyPatch::default()
//! };
//!
//! let merged = MergeStrategy::FieldWalk.merger().merge(stored.clone(), &patch);
//! assert_eq!(merged.name, "Company A");
//! assert_eq!(merged.city, "Novi Sad");
//! assert_eq!(merged, MergeStrategy::Mapping.merger().merge(stored, &patch));
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use companies::{CompanyService, InMemoryCompanyStore, create_company_router};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = Arc::new(CompanyService::new(Arc::new(InMemoryCompanyStore::new())));
//! let app = axum::Router::new().nest("/api", create_company_router(service));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

extern crate self as companies;

mod company;
mod data_store;
mod errors;
mod field_walk;
mod mapping;
mod merge;
mod service;
mod validate;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
///
/// This module provides common CLI utilities for the companies binaries, including
/// error handling, formatted output, and program termination functions.
pub mod cli_utils;

/// Command-line interface command handlers.
///
/// This module contains the command handlers for the companyctl CLI application.
pub mod commands;

/// HTTP client utilities for interacting with a companies server.
///
/// This module provides a standardized HTTP client for the companies HTTP API,
/// handling requests, responses, and error conditions.
pub mod http_utils;

/// PostgreSQL storage.
pub mod sql;

pub use company::{
    Company, CompanyBody, CompanyId, CompanyIdParseError, CompanyPatch, CreateCompanyResponse,
    PatchParams, create_company_router,
};
pub use data_store::{CompanyEdit, CompanyStore, InMemoryCompanyStore};
pub use errors::{CompanyError, DataStoreError};
pub use field_walk::{FieldValue, FieldWalk, WalkField, is_not_blank, walk_merge};
pub use mapping::{COMPANY_MAPPING, FieldRule, Mapping};
pub use merge::{FieldWalkMerger, MappingMerger, MergeStrategy, MergeStrategyParseError, Merger};
pub use service::CompanyService;
pub use validate::{
    MATICNI_BROJ_LENGTH, PIB_LENGTH, VALIDATION_TITLE, ValidationErrors, ValidationProblem,
    validate_create,
};

//! # Partial-Update Merging
//!
//! A merge applies the meaningfully-set fields of a [`CompanyPatch`] onto an existing
//! [`Company`]. Absent fields and text that is empty or whitespace-only leave the
//! company untouched; the identifier always survives from the existing company.
//!
//! Two interchangeable strategies implement [`Merger`]:
//!
//! - [`FieldWalkMerger`] walks the patch's fields by name using the code generated by
//!   `#[derive(FieldWalk)]` and sets each one on the same-named company field.
//! - [`MappingMerger`] evaluates the statically authored [`COMPANY_MAPPING`] table.
//!
//! Both produce identical results for every input.
//!
//! ```rust
//! use companies::{Company, CompanyId, CompanyPatch, MergeStrategy};
//!
//! let existing = Company {
//!     id: CompanyId::new(2),
//!     name: "Company B".to_string(),
//!     street: "Address B".to_string(),
//!     ..Company::default()
//! };
//! let patch = CompanyPatch {
//!     name: Some("  ".to_string()),
//!     street: None,
//!     ..CompanyPatch::default()
//! };
//!
//! for strategy in [MergeStrategy::FieldWalk, MergeStrategy::Mapping] {
//!     assert_eq!(strategy.merger().merge(existing.clone(), &patch), existing);
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{COMPANY_MAPPING, Company, CompanyPatch, walk_merge};

/// Merges a sparse patch into an existing company.
pub trait Merger: Send + Sync {
    /// Returns `existing` with every meaningful patch field applied.
    fn merge(&self, existing: Company, patch: &CompanyPatch) -> Company;
}

/// Merges by walking the patch's fields by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldWalkMerger;

impl Merger for FieldWalkMerger {
    fn merge(&self, mut existing: Company, patch: &CompanyPatch) -> Company {
        walk_merge(&mut existing, patch);
        existing
    }
}

/// Merges through the declarative [`COMPANY_MAPPING`] table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingMerger;

impl Merger for MappingMerger {
    fn merge(&self, mut existing: Company, patch: &CompanyPatch) -> Company {
        COMPANY_MAPPING.apply(patch, &mut existing);
        existing
    }
}

/// Selects which [`Merger`] a partial update uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Walk the patch's fields by name.
    #[default]
    FieldWalk,
    /// Evaluate the declarative mapping table.
    Mapping,
}

static FIELD_WALK: FieldWalkMerger = FieldWalkMerger;
static MAPPING: MappingMerger = MappingMerger;

impl MergeStrategy {
    /// Maps the HTTP `reflection` flag: `true` walks fields, `false` uses the mapping.
    pub fn from_reflection(reflection: bool) -> Self {
        if reflection {
            MergeStrategy::FieldWalk
        } else {
            MergeStrategy::Mapping
        }
    }

    /// The value of the HTTP `reflection` flag selecting this strategy.
    pub fn reflection(self) -> bool {
        self == MergeStrategy::FieldWalk
    }

    /// The built-in merger for this strategy.
    pub fn merger(self) -> &'static dyn Merger {
        match self {
            MergeStrategy::FieldWalk => &FIELD_WALK,
            MergeStrategy::Mapping => &MAPPING,
        }
    }
}

impl Display for MergeStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MergeStrategy::FieldWalk => write!(f, "field-walk"),
            MergeStrategy::Mapping => write!(f, "mapping"),
        }
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStrategyParseError {
    invalid: String,
}

impl Display for MergeStrategyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Unknown merge strategy {:?}; expected \"field-walk\" or \"mapping\"",
            self.invalid
        )
    }
}

impl std::error::Error for MergeStrategyParseError {}

impl FromStr for MergeStrategy {
    type Err = MergeStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field-walk" | "reflection" => Ok(MergeStrategy::FieldWalk),
            "mapping" => Ok(MergeStrategy::Mapping),
            _ => Err(MergeStrategyParseError {
                invalid: s.to_string(),
            }),
        }
    }
}

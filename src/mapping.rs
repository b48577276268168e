//! # Declarative Field Mapping
//!
//! A [`Mapping`] is a statically authored table of copy rules from a source type to a
//! destination type. Each [`FieldRule`] names its source and destination fields, holds
//! typed accessors for both, and carries the condition under which the copy happens.
//! Because the accessors are ordinary functions, a renamed or retyped field is a
//! compile error rather than a silently skipped copy.
//!
//! [`COMPANY_MAPPING`] is the table used to merge a [`CompanyPatch`] into a [`Company`].
//!
//! ```rust
//! use companies::{COMPANY_MAPPING, Company, CompanyPatch};
//!
//! let mut company = Company::default();
//! let patch = CompanyPatch {
//!     pib: Some("123456789".to_string()),
//!     street: Some(String::new()),
//!     ..CompanyPatch::default()
//! };
//! assert_eq!(COMPANY_MAPPING.apply(&patch, &mut company), 1);
//! assert_eq!(company.pib, "123456789");
//! ```

use crate::field_walk::is_not_blank;
use crate::{Company, CompanyPatch};

/// How a rule reads, tests and writes its field.
enum FieldCopy<S, D> {
    Text {
        read: fn(&S) -> Option<&str>,
        write: fn(&mut D) -> &mut String,
        condition: fn(&str) -> bool,
    },
    Flag {
        read: fn(&S) -> Option<bool>,
        write: fn(&mut D) -> &mut bool,
    },
}

/// One entry of a [`Mapping`]: copy a source field onto a destination field.
pub struct FieldRule<S, D> {
    source: &'static str,
    destination: &'static str,
    copy: FieldCopy<S, D>,
}

impl<S, D> FieldRule<S, D> {
    /// A text rule that skips absent, empty and whitespace-only values.
    pub const fn text(
        source: &'static str,
        destination: &'static str,
        read: fn(&S) -> Option<&str>,
        write: fn(&mut D) -> &mut String,
    ) -> Self {
        Self {
            source,
            destination,
            copy: FieldCopy::Text {
                read,
                write,
                condition: is_not_blank,
            },
        }
    }

    /// A boolean rule; any present value is copied.
    pub const fn flag(
        source: &'static str,
        destination: &'static str,
        read: fn(&S) -> Option<bool>,
        write: fn(&mut D) -> &mut bool,
    ) -> Self {
        Self {
            source,
            destination,
            copy: FieldCopy::Flag { read, write },
        }
    }

    /// Name of the field read from the source.
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Name of the field written on the destination.
    pub fn destination(&self) -> &'static str {
        self.destination
    }

    /// Applies the rule, returning true when the destination was written.
    pub fn apply(&self, source: &S, destination: &mut D) -> bool {
        match &self.copy {
            FieldCopy::Text {
                read,
                write,
                condition,
            } => match read(source) {
                Some(text) if condition(text) => {
                    *write(destination) = text.to_string();
                    true
                }
                _ => false,
            },
            FieldCopy::Flag { read, write } => match read(source) {
                Some(flag) => {
                    *write(destination) = flag;
                    true
                }
                None => false,
            },
        }
    }
}

/// A fixed table of [`FieldRule`]s evaluated in order.
pub struct Mapping<S: 'static, D: 'static> {
    rules: &'static [FieldRule<S, D>],
}

impl<S: 'static, D: 'static> Mapping<S, D> {
    /// Creates a mapping over a static rule table.
    pub const fn new(rules: &'static [FieldRule<S, D>]) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &'static [FieldRule<S, D>] {
        self.rules
    }

    /// Applies every rule, returning how many wrote to the destination.
    pub fn apply(&self, source: &S, destination: &mut D) -> usize {
        self.rules
            .iter()
            .filter(|rule| rule.apply(source, destination))
            .count()
    }
}

type CompanyRule = FieldRule<CompanyPatch, Company>;

/// Merges a [`CompanyPatch`] into a [`Company`]; the identifier has no rule.
pub static COMPANY_MAPPING: Mapping<CompanyPatch, Company> = Mapping::new(&[
    CompanyRule::text("name", "name", |p| p.name.as_deref(), |c| &mut c.name),
    CompanyRule::text("city", "city", |p| p.city.as_deref(), |c| &mut c.city),
    CompanyRule::text("street", "street", |p| p.street.as_deref(), |c| &mut c.street),
    CompanyRule::text("pib", "pib", |p| p.pib.as_deref(), |c| &mut c.pib),
    CompanyRule::text(
        "maticni_broj",
        "maticni_broj",
        |p| p.maticni_broj.as_deref(),
        |c| &mut c.maticni_broj,
    ),
    CompanyRule::flag("is_active", "is_active", |p| p.is_active, |c| &mut c.is_active),
]);

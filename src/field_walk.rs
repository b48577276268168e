//! # Field Walking
//!
//! Name-addressed access to struct fields, generated at compile time by
//! `#[derive(companies_derive::FieldWalk)]`.
//!
//! A type implementing [`FieldWalk`] can enumerate its fields as `(name, value)` pairs
//! and accept a value for a field by name. [`walk_merge`] uses the two halves to copy
//! every meaningful field of a patch onto a same-shaped target without either type
//! knowing about the other.
//!
//! ```rust
//! use companies::{Company, CompanyId, CompanyPatch, walk_merge};
//!
//! let mut company = Company {
//!     id: CompanyId::new(1),
//!     name: "Company A".to_string(),
//!     ..Company::default()
//! };
//! let patch = CompanyPatch {
//!     name: Some("   ".to_string()),
//!     city: Some("Novi Sad".to_string()),
//!     ..CompanyPatch::default()
//! };
//!
//! assert_eq!(walk_merge(&mut company, &patch), 1);
//! assert_eq!(company.name, "Company A");
//! assert_eq!(company.city, "Novi Sad");
//! ```

/// A single field value, detached from the struct it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A text field.
    Text(String),
    /// A boolean field.
    Flag(bool),
}

impl FieldValue {
    /// Returns true when the value should be applied by a merge.
    ///
    /// Text is meaningful unless it is empty or consists only of whitespace. Booleans
    /// have no blank state and are always meaningful.
    pub fn is_meaningful(&self) -> bool {
        match self {
            FieldValue::Text(text) => is_not_blank(text),
            FieldValue::Flag(_) => true,
        }
    }
}

/// Returns true when `text` has at least one non-whitespace character.
pub fn is_not_blank(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Conversion between a field's Rust type and [`FieldValue`].
///
/// `Option<T>` maps `None` to an absent value, which lets sparse patch types be walked
/// with the same code as fully-populated entities.
pub trait WalkField: Sized {
    /// Reads the field, returning `None` when it holds no value.
    fn to_field_value(&self) -> Option<FieldValue>;

    /// Converts a value into this field's type, or `None` on a type mismatch.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

impl WalkField for String {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Text(self.clone()))
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }
}

impl WalkField for bool {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Flag(*self))
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Flag(flag) => Some(flag),
            FieldValue::Text(_) => None,
        }
    }
}

impl<T: WalkField> WalkField for Option<T> {
    fn to_field_value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(WalkField::to_field_value)
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        T::from_field_value(value).map(Some)
    }
}

/// Name-addressed field access, normally derived with `companies_derive::FieldWalk`.
pub trait FieldWalk {
    /// Every walked field in declaration order, paired with its current value.
    fn fields(&self) -> Vec<(&'static str, Option<FieldValue>)>;

    /// Assigns `value` to the field called `name`.
    ///
    /// Returns false when there is no such walked field or the value has the wrong type.
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;
}

/// Copies every meaningful field of `patch` onto the same-named field of `target`.
///
/// Absent and blank values are skipped, as are patch fields with no writable
/// counterpart on the target. Returns the number of fields assigned.
pub fn walk_merge<T: FieldWalk, P: FieldWalk>(target: &mut T, patch: &P) -> usize {
    let mut applied = 0;
    for (name, value) in patch.fields() {
        let Some(value) = value else {
            continue;
        };
        if !value.is_meaningful() {
            continue;
        }
        if target.set_field(name, value) {
            applied += 1;
        }
    }
    applied
}

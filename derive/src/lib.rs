//! # Companies Derive Macros
//!
//! This crate provides derive macros for the companies library, specifically the
//! compile-time generated field walk used by the field-walk merge strategy.
//!
//! ## FieldWalk Derive Macro
//!
//! The `FieldWalk` derive macro implements the `companies::FieldWalk` trait for
//! structs with named fields. The generated code:
//!
//! - **Enumerates fields**: `fields()` returns every walked field by name, with its
//!   current value converted to a `companies::FieldValue` (`None` for absent values)
//! - **Sets fields by name**: `set_field(name, value)` assigns the same-named field
//!   when the value converts to the field's type, and reports whether it did
//!
//! Fields annotated with `#[walk(skip)]` are left out of both directions. This is
//! how an entity keeps its identifier out of reach of any patch.
//!
//! ### Examples
//!
//! ```rust,ignore
//! use companies::{FieldValue, FieldWalk};
//!
//! #[derive(Default, companies_derive::FieldWalk)]
//! struct Contact {
//!     #[walk(skip)]
//!     id: i32,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let mut contact = Contact::default();
//! assert!(contact.set_field("name", FieldValue::Text("Ana".to_string())));
//! assert!(!contact.set_field("id", FieldValue::Text("7".to_string())));
//!
//! let names: Vec<&str> = contact.fields().into_iter().map(|(name, _)| name).collect();
//! assert_eq!(names, vec!["name", "email"]);
//! ```
//!
//! ## Implementation Details
//!
//! The derive macro uses the `derive_util` crate to traverse the struct definition and
//! delegates per-field conversions to the `companies::WalkField` trait, so any field
//! type implementing that trait can be walked.

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use derive_util::StructVisitor;

/// Derive the FieldWalk trait for structs with named fields.
#[proc_macro_derive(FieldWalk, attributes(walk))]
pub fn derive_field_walk(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ty_name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (fields, setters) = match input.data {
        syn::Data::Struct(ref ds) => {
            let mut fwv = FieldWalkStructVisitor;
            fwv.visit_struct(&ty_name, ds)
        }
        syn::Data::Enum(_) => {
            panic!("enums are not supported");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let generated = quote! {
        impl #impl_generics companies::FieldWalk for #ty_name #ty_generics #where_clause {
            fn fields(&self) -> Vec<(&'static str, Option<companies::FieldValue>)> {
                let mut fields = Vec::new();
                #fields
                fields
            }

            fn set_field(&mut self, name: &str, value: companies::FieldValue) -> bool {
                match name {
                    #setters
                    _ => false,
                }
            }
        }
    };
    generated.into()
}

/// Returns true when the field carries `#[walk(skip)]`.
fn is_skipped(field: &syn::Field) -> bool {
    field.attrs.iter().any(|attr| {
        if !attr.path.is_ident("walk") {
            return false;
        }
        match attr.parse_meta() {
            Ok(syn::Meta::List(list)) => list.nested.iter().any(|nested| {
                matches!(nested, syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("skip"))
            }),
            _ => panic!("expected #[walk(skip)]"),
        }
    })
}

///////////////////////////////////////// FieldWalkStructVisitor ////////////////////////////////////////

struct FieldWalkStructVisitor;

impl StructVisitor for FieldWalkStructVisitor {
    type Output = (TokenStream, TokenStream);

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        fields: &syn::FieldsNamed,
    ) -> Self::Output {
        let mut getters = quote! {};
        let mut setters = quote! {};
        for field in fields.named.iter() {
            if is_skipped(field) {
                continue;
            }
            if let Some(field_ident) = &field.ident {
                let field_name = field_ident.to_string();
                let field_name = if let Some(field_name) = field_name.strip_prefix("r#") {
                    field_name.to_string()
                } else {
                    field_name.clone()
                };
                let field_type = field.ty.clone();
                getters = quote! {
                    #getters
                    fields.push((
                        #field_name,
                        <#field_type as companies::WalkField>::to_field_value(&self.#field_ident),
                    ));
                };
                setters = quote! {
                    #setters
                    #field_name => match <#field_type as companies::WalkField>::from_field_value(value) {
                        Some(converted) => {
                            self.#field_ident = converted;
                            true
                        }
                        None => false,
                    },
                };
            }
        }
        (getters, setters)
    }
}

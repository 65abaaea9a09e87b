//! Derive macros for quarry
//!
//! Provides `#[derive(Document)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod document;

/// Derive `Document` for a struct with named fields.
///
/// Every field type must implement `quarry::Scanner`. Columns are matched by
/// field name unless renamed.
///
/// # Example
///
/// ```ignore
/// use quarry::Document;
///
/// #[derive(Default, Document)]
/// struct User {
///     id: i64,
///     #[quarry(column = "full_name")]
///     name: String,
///     #[quarry(skip)]
///     display: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[quarry(column = "name")]` - Map field to a different column name
/// - `#[quarry(skip)]` - Never decode into this field
#[proc_macro_derive(Document, attributes(quarry))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    document::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

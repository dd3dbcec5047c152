//! Procedural macros for `strata_config`.
//!
//! The [`Record`] derive generates the record descriptor and the typed
//! conversions used by `strata_config::codec`. Field keys in untyped data
//! default to the Rust field name; `#[record(rename = "...")]` and the
//! container-level `#[record(rename_all = "...")]` change them.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `strata_config::codec::Record` and `strata_config::codec::Shape`.
///
/// Container attributes:
/// - `rename_all = "camelCase"` (and the other serde-style rules) computes
///   external keys from field names;
/// - `crate = "path"` points generated code at a renamed dependency.
///
/// Field attributes:
/// - `rename = "key"` sets the external key;
/// - `default` fills an absent field with `Default::default()`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[record(crate = "...")]` attribute value into the
//! tokens that prefix every path in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `strata_config` when no override is present.
///
/// ```rust,ignore
/// let default = resolve(None);
/// assert_eq!(default.to_string(), "strata_config");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { strata_config }, |path| quote! { #path })
}

//! Parsing utilities for the `Record` derive macro.

use syn::Attribute;
use syn::meta::ParseNestedMeta;

mod input;
mod literals;
mod rename;
#[cfg(test)]
mod tests;

pub(crate) use input::{RecordField, RecordInput, parse_input};
use literals::lit_str;
pub(crate) use rename::RenameRule;

/// Container-level `#[record(...)]` options.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Rule deriving external keys from field names.
    pub rename_all: Option<RenameRule>,
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[record(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `strata_config::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(Record)]`.
///
/// - `rename` sets the key used in untyped data.
/// - `default` fills an absent field with `Default::default()`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub default: bool,
}

/// Iterate all `#[record(...)]` attributes once and apply a callback.
fn parse_record_attrs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, scope: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown {scope} attribute `{key}`"))
}

/// Parse container-level `#[record(...)]` attributes.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_record_attrs(attrs, |meta| {
        if meta.path.is_ident("rename_all") {
            let value = lit_str(meta, "rename_all")?;
            out.rename_all = Some(RenameRule::parse(&value)?);
            Ok(())
        } else if meta.path.is_ident("crate") {
            let value = lit_str(meta, "crate")?;
            out.crate_path = Some(value.parse()?);
            Ok(())
        } else {
            Err(unknown_key(meta, "record container"))
        }
    })?;
    Ok(out)
}

/// Parse field-level `#[record(...)]` attributes.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_record_attrs(attrs, |meta| {
        if meta.path.is_ident("rename") {
            out.rename = Some(lit_str(meta, "rename")?.value());
            Ok(())
        } else if meta.path.is_ident("default") {
            out.default = true;
            Ok(())
        } else {
            Err(unknown_key(meta, "record field"))
        }
    })?;
    Ok(out)
}

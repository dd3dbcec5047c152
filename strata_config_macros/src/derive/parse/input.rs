//! Input parsing for the `Record` derive macro.
//!
//! This module gathers the struct identifier, fields, and attribute metadata
//! in one pass so macro expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields};

use super::rename::external_name;
use super::{FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs};

/// One named field with its resolved external key.
pub(crate) struct RecordField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    /// Field name without any `r#` prefix.
    pub name: String,
    pub external: String,
    pub attrs: FieldAttrs,
}

/// Everything the generator needs from the user's struct.
pub(crate) struct RecordInput {
    pub ident: syn::Ident,
    pub fields: Vec<RecordField>,
    pub attrs: StructAttrs,
}

/// Gathers information from the user-provided struct.
///
/// Only non-generic structs with named fields are accepted; anything else is
/// rejected with a spanned error.
pub(crate) fn parse_input(input: &DeriveInput) -> Result<RecordInput, syn::Error> {
    let ident = input.ident.clone();
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Record requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(field_ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "unnamed fields are not supported"));
        };
        let field_attrs = parse_field_attrs(&field.attrs)?;
        let raw = field_ident.to_string();
        let name = raw.strip_prefix("r#").unwrap_or(&raw).to_owned();
        let external = external_name(&raw, field_attrs.rename.as_deref(), attrs.rename_all);
        fields.push(RecordField {
            ident: field_ident,
            ty: field.ty.clone(),
            name,
            external,
            attrs: field_attrs,
        });
    }
    check_unique_keys(&fields)?;
    Ok(RecordInput {
        ident,
        fields,
        attrs,
    })
}

fn check_unique_keys(fields: &[RecordField]) -> syn::Result<()> {
    for (index, field) in fields.iter().enumerate() {
        let clash = fields
            .iter()
            .take(index)
            .any(|earlier| earlier.external == field.external);
        if clash {
            return Err(syn::Error::new_spanned(
                &field.ident,
                format!("duplicate external key '{}'", field.external),
            ));
        }
    }
    Ok(())
}

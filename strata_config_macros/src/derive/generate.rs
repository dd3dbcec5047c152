//! Token generation for `#[derive(Record)]`.
//!
//! Two impls are emitted: `codec::Record`, which owns the cached descriptor
//! and flattening, and `codec::Shape`, which plugs the record into the
//! generic conversion machinery.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{RecordField, RecordInput};

pub(crate) fn record_impls(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let record_impl = record_trait_impl(record, krate);
    let shape_impl = shape_trait_impl(record, krate);
    quote! {
        #record_impl
        #shape_impl
    }
}

fn field_descriptor(field: &RecordField, krate: &TokenStream) -> TokenStream {
    let RecordField {
        ty, name, external, ..
    } = field;
    let required = if field.attrs.default {
        quote! { false }
    } else {
        quote! { <#ty as #krate::codec::Shape>::missing().is_none() }
    };
    quote! {
        #krate::codec::FieldDescriptor::new(
            #name,
            #external,
            <#ty as #krate::codec::Shape>::descriptor(),
            #required,
        )
    }
}

fn record_trait_impl(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let ident = &record.ident;
    let record_name = ident.to_string();
    let descriptors = record.fields.iter().map(|field| field_descriptor(field, krate));
    let mapping = if record.fields.is_empty() {
        quote! { #krate::value::Mapping::new() }
    } else {
        let len = record.fields.len();
        let inserts = record.fields.iter().map(|field| {
            let RecordField {
                ident, external, ..
            } = field;
            quote! {
                map.insert(
                    ::std::string::String::from(#external),
                    #krate::codec::Shape::to_value(&self.#ident),
                );
            }
        });
        quote! {
            let mut map = #krate::value::Mapping::with_capacity(#len);
            #( #inserts )*
            map
        }
    };
    quote! {
        impl #krate::codec::Record for #ident {
            fn record_descriptor() -> ::std::sync::Arc<#krate::codec::RecordDescriptor> {
                static DESCRIPTOR: ::std::sync::OnceLock<
                    ::std::sync::Arc<#krate::codec::RecordDescriptor>,
                > = ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(DESCRIPTOR.get_or_init(|| {
                    ::std::sync::Arc::new(#krate::codec::RecordDescriptor::new(
                        #record_name,
                        ::std::vec![#( #descriptors ),*],
                    ))
                }))
            }

            fn to_mapping(&self) -> #krate::value::Mapping {
                #mapping
            }
        }
    }
}

fn shape_trait_impl(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let ident = &record.ident;
    let construct = if record.fields.is_empty() {
        quote! {
            #krate::codec::RecordFields::new(&descriptor, value, path)?;
            ::core::result::Result::Ok(Self {})
        }
    } else {
        let takes = record.fields.iter().map(|field| {
            let RecordField {
                ident, ty, name, ..
            } = field;
            if field.attrs.default {
                quote! { #ident: fields.take_or_default::<#ty>(#name)? }
            } else {
                quote! { #ident: fields.take::<#ty>(#name)? }
            }
        });
        quote! {
            let mut fields = #krate::codec::RecordFields::new(&descriptor, value, path)?;
            ::core::result::Result::Ok(Self { #( #takes ),* })
        }
    };
    quote! {
        impl #krate::codec::Shape for #ident {
            fn descriptor() -> #krate::codec::Descriptor {
                #krate::codec::Descriptor::Record(
                    <Self as #krate::codec::Record>::record_descriptor(),
                )
            }

            fn from_value(
                value: #krate::Value,
                path: &#krate::codec::FieldPath,
            ) -> #krate::StrataResult<Self> {
                let descriptor = <Self as #krate::codec::Record>::record_descriptor();
                #construct
            }

            fn to_value(&self) -> #krate::Value {
                #krate::Value::Mapping(<Self as #krate::codec::Record>::to_mapping(self))
            }
        }
    }
}

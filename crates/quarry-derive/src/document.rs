//! Document derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

struct MappedField {
    ident: syn::Ident,
    column: String,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Document can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Document can only be derived for structs",
            ));
        }
    };

    let mut mapped = Vec::new();
    let mut columns = HashSet::new();
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let Some(column) = column_name(field, &ident)? else {
            continue;
        };
        if !columns.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("column `{column}` is mapped by more than one field"),
            ));
        }
        mapped.push(MappedField { ident, column });
    }

    let idents: Vec<_> = mapped.iter().map(|f| &f.ident).collect();
    let slots: Vec<_> = mapped
        .iter()
        .map(|f| format_ident!("__quarry_slot_{}", f.ident))
        .collect();
    let column_names: Vec<_> = mapped.iter().map(|f| f.column.as_str()).collect();

    Ok(quote! {
        impl #impl_generics ::quarry::Document for #name #ty_generics #where_clause {
            fn scanners<'__q>(
                &'__q mut self,
                __quarry_fields: &[::std::string::String],
            ) -> ::std::vec::Vec<::std::option::Option<&'__q mut dyn ::quarry::Scanner>> {
                let Self { #(#idents,)* .. } = self;
                #(
                    let mut #slots = ::std::option::Option::Some(#idents as &mut dyn ::quarry::Scanner);
                )*

                __quarry_fields
                    .iter()
                    .map(|__quarry_field| match __quarry_field.as_str() {
                        #(#column_names => #slots.take(),)*
                        _ => ::std::option::Option::None,
                    })
                    .collect()
            }
        }
    })
}

/// Column for `field`; `None` when the field is skipped.
fn column_name(field: &syn::Field, ident: &syn::Ident) -> Result<Option<String>> {
    let mut column = None;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let value: LitStr = meta.value()?.parse()?;
                column = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `column = \"...\"` or `skip`"))
            }
        })?;
    }

    if skip {
        return Ok(None);
    }
    Ok(Some(column.unwrap_or_else(|| {
        ident.to_string().trim_start_matches("r#").to_string()
    })))
}

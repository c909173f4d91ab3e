//! Procedural macros for Wirebox.
//!
//! Use them through `wirebox` or `wirebox-derive`; the generated code
//! refers to `::wirebox` paths.

use darling::ast::Data;
use darling::util::Ignored;
use darling::{FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, Type, parse_macro_input};

/// Derives `wirebox::namespace::Namespace` for a struct with named fields.
///
/// Every field becomes an item named after the field, in declaration
/// order. Fields are cloned when the container includes the namespace.
///
/// Field attributes:
/// - `#[namespace(rename = "Name")]`: item name other than the field name;
/// - `#[namespace(constant)]`: wrap the field in a `Value` as a constant,
///   for types without an `IntoItem` impl;
/// - `#[namespace(skip)]`: not an item.
///
/// ```rust,ignore
/// #[derive(Clone, Namespace)]
/// struct Widgets {
///     #[namespace(rename = "Widget1")]
///     widget: Factory,
///     version: &'static str,
///     #[namespace(constant)]
///     limits: Limits,
///     #[namespace(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Namespace, attributes(namespace))]
pub fn derive_namespace(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_namespace(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

#[derive(FromDeriveInput)]
#[darling(attributes(namespace), supports(struct_named))]
struct NamespaceInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, NamespaceField>,
}

#[derive(FromField)]
#[darling(attributes(namespace))]
struct NamespaceField {
    ident: Option<Ident>,
    ty: Type,
    #[darling(default)]
    rename: Option<String>,
    #[darling(default)]
    skip: bool,
    #[darling(default)]
    constant: bool,
}

impl NamespaceField {
    fn item(&self) -> darling::Result<Option<TokenStream2>> {
        if self.skip {
            if self.constant || self.rename.is_some() {
                return Err(darling::Error::custom(
                    "`skip` cannot be combined with `rename` or `constant`",
                )
                .with_span(&self.ty));
            }
            return Ok(None);
        }

        let Some(ident) = &self.ident else {
            return Err(darling::Error::unsupported_shape("tuple field"));
        };
        let name = self
            .rename
            .clone()
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());

        let implementation = if self.constant {
            quote! {
                ::wirebox::namespace::ItemImpl::Constant(
                    ::wirebox::value::Value::new(::core::clone::Clone::clone(&self.#ident))
                )
            }
        } else {
            quote! {
                ::wirebox::namespace::IntoItem::into_item(::core::clone::Clone::clone(&self.#ident))
            }
        };

        Ok(Some(quote! {
            ::wirebox::namespace::Item::new(#name, #implementation)
        }))
    }
}

fn expand_namespace(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let parsed = NamespaceInput::from_derive_input(input)?;
    let Some(fields) = parsed.data.as_ref().take_struct() else {
        return Err(darling::Error::unsupported_shape("enum"));
    };

    let mut errors = darling::Error::accumulator();
    let items: Vec<TokenStream2> = fields
        .iter()
        .filter_map(|field| errors.handle(field.item()).flatten())
        .collect();
    errors.finish()?;

    let ident = &parsed.ident;
    let (impl_generics, ty_generics, where_clause) = parsed.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::wirebox::namespace::Namespace for #ident #ty_generics #where_clause {
            fn items(&self) -> ::std::vec::Vec<::wirebox::namespace::Item> {
                ::std::vec![#(#items),*]
            }
        }
    })
}

//! Derive macros for wirebox
//!
//! This crate provides the `#[derive(Service)]` macro assigning a stable
//! canonical registration name to a type.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, LitStr};

/// Generates a `wirebox::Service` implementation for a type.
///
/// The canonical name defaults to `module_path!()::TypeName`. It can be
/// overridden with `#[service(name = "my-stable-name")]`, which is the
/// recommended form for names that must survive refactorings.
#[proc_macro_derive(Service, attributes(service))]
pub fn derive_service(input: TokenStream) -> TokenStream {
    // Parse input TokenStream
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    // Look for an explicit #[service(name = "...")] override
    let mut explicit: Option<LitStr> = None;
    for attr in &input.attrs {
        if attr.path().is_ident("service") {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    explicit = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `name = \"...\"`"))
                }
            });
            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }
    }

    let name_expr = match explicit {
        Some(lit) => quote! { #lit },
        None => {
            let ident = name.to_string();
            quote! { concat!(module_path!(), "::", #ident) }
        }
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Generate implementation code
    let expanded = quote! {
        impl #impl_generics ::wirebox::Service for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_expr;
        }
    };

    TokenStream::from(expanded)
}

//! Derive macro for codec error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations, plus
//! `From` conversions for variants wrapping a lower-level error.
//!
//! # Usage
//!
//! ```ignore
//! use raffle_codec_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum CodecError {
//!     #[error("cell error: {0}")]
//!     Cell(#[from] CellError),
//!
//!     #[error("value {value} does not fit in {bits} bits")]
//!     ValueOutOfRange { value: u128, bits: usize },
//!
//!     #[error("too many references")]
//!     TooManyReferences,
//! }
//! ```
//!
//! # Supported Features
//!
//! - Unit variants: `#[error("message")]`
//! - Tuple variants with positional args: `#[error("error: {0}")]`
//! - Struct variants with named args: `#[error("expected {expected}")]`
//! - `#[from]` on the only field of a tuple variant: emits `From<Field>` and
//!   reports the field through `Error::source`

use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DataEnum, DeriveInput, Fields, Lit, Meta, parse_macro_input};

/// Derives `Display` and `Error` for an enum.
///
/// Each variant must have an `#[error("...")]` attribute specifying
/// the display message. Supports field interpolation using `{0}`, `{1}`
/// for tuple fields or `{field_name}` for struct fields.
pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_error_derive(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_error_derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    match &input.data {
        Data::Enum(data_enum) => {
            let display_arms = data_enum
                .variants
                .iter()
                .map(display_arm)
                .collect::<syn::Result<Vec<_>>>()?;
            let from_variants = collect_from_variants(data_enum)?;

            let source_arms = from_variants.iter().map(|(variant, _)| {
                quote! {
                    Self::#variant(source) => Some(source),
                }
            });
            let from_impls = from_variants.iter().map(|(variant, ty)| {
                quote! {
                    impl #impl_generics ::std::convert::From<#ty> for #name #ty_generics #where_clause {
                        fn from(source: #ty) -> Self {
                            Self::#variant(source)
                        }
                    }
                }
            });

            Ok(quote! {
                impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        match self {
                            #(#display_arms)*
                        }
                    }
                }

                impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {
                    #[allow(unreachable_patterns)]
                    fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                        match self {
                            #(#source_arms)*
                            _ => None,
                        }
                    }
                }

                #(#from_impls)*
            })
        }
        Data::Struct(_) | Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Error derive only supports enums",
        )),
    }
}

/// Builds the `Display` match arm for one enum variant.
fn display_arm(variant: &syn::Variant) -> syn::Result<proc_macro2::TokenStream> {
    let variant_name = &variant.ident;
    let error_msg = extract_error_message_from_attrs(
        &variant.attrs,
        &variant.ident,
        &format!("variant `{}`", variant.ident),
    )?;

    let arm = match &variant.fields {
        Fields::Unit => quote! {
            Self::#variant_name => write!(f, #error_msg),
        },
        Fields::Unnamed(fields) => {
            let field_names: Vec<_> = (0..fields.unnamed.len())
                .map(|i| quote::format_ident!("f{}", i))
                .collect();
            let format_str = convert_positional_to_named(&error_msg, fields.unnamed.len());
            quote! {
                Self::#variant_name(#(#field_names),*) => write!(f, #format_str, #(#field_names = #field_names),*),
            }
        }
        Fields::Named(fields) => {
            let field_names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
            quote! {
                Self::#variant_name { #(#field_names),* } => write!(f, #error_msg, #(#field_names = #field_names),*),
            }
        }
    };

    Ok(arm)
}

/// Returns `(variant, field type)` for every variant carrying a `#[from]` field.
///
/// `#[from]` is only accepted on single-field tuple variants.
fn collect_from_variants(data: &DataEnum) -> syn::Result<Vec<(syn::Ident, syn::Type)>> {
    let mut out = Vec::new();
    for variant in &data.variants {
        let fields = match &variant.fields {
            Fields::Unnamed(fields) => fields,
            other => {
                if other
                    .iter()
                    .any(|f| f.attrs.iter().any(|a| a.path().is_ident("from")))
                {
                    return Err(syn::Error::new_spanned(
                        &variant.ident,
                        "#[from] is only supported on tuple variants",
                    ));
                }
                continue;
            }
        };

        let marked = fields
            .unnamed
            .iter()
            .any(|f| f.attrs.iter().any(|a| a.path().is_ident("from")));
        if !marked {
            continue;
        }
        if fields.unnamed.len() != 1 {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "#[from] requires exactly one field, e.g. `Cell(#[from] CellError)`",
            ));
        }
        out.push((variant.ident.clone(), fields.unnamed[0].ty.clone()));
    }
    Ok(out)
}

/// Extracts the error message from attributes.
fn extract_error_message_from_attrs<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    for attr in attrs {
        if !attr.path().is_ident("error") {
            continue;
        }
        let Meta::List(meta_list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                &attr.meta,
                "invalid #[error] attribute; use #[error(\"message\")] to describe the error",
            ));
        };
        let lit = syn::parse2::<Lit>(meta_list.tokens.clone()).map_err(|_| {
            syn::Error::new_spanned(
                &attr.meta,
                "failed to parse #[error] attribute; expected a string literal like #[error(\"malformed dictionary: {0}\")]",
            )
        })?;
        if let Lit::Str(lit_str) = lit {
            return Ok(lit_str.value());
        }
        return Err(syn::Error::new_spanned(
            &attr.meta,
            "invalid #[error] attribute: message must be a string literal",
        ));
    }

    Err(syn::Error::new_spanned(
        target,
        format!(
            "missing #[error(\"...\")] attribute on {}; every error variant must declare a display message",
            target_desc
        ),
    ))
}

/// Converts positional format args `{0}`, `{1}` to named args `{f0}`, `{f1}`.
fn convert_positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result.replace(&format!("{{{}}}", i), &format!("{{f{}}}", i));
        result = result.replace(&format!("{{{}:", i), &format!("{{f{}:", i));
    }
    result
}

//! `#[derive(Error)]`: `Display` and `std::error::Error` for error enums.
//!
//! Each variant declares its message with an `#[error("...")]` attribute.
//! The message is a format template: `{field}` interpolates a named field,
//! `{0}` a positional one, `{{`/`}}` escape braces, and format specs such
//! as `{0:x}` pass through. Fields a template does not mention are simply
//! not bound, so variants may carry context their message omits.
//!
//! # Usage
//!
//! ```ignore
//! use txpool_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum AdmissionError {
//!     #[error("transaction {0} is already pooled")]
//!     Duplicate(Hash),
//!
//!     #[error("nonce {nonce} is behind the chain nonce {chain_nonce}")]
//!     Stale { nonce: u64, chain_nonce: u64 },
//!
//!     #[error("no free slot")]
//!     Full,
//! }
//! ```
//!
//! Placeholders are checked against the variant's fields at expansion
//! time, so a typo like `{nonze}` is a compile error on the derive rather
//! than an opaque failure inside the generated `write!`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr};

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match try_expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Error can only be derived for enums",
        ));
    };

    let arms = data
        .variants
        .iter()
        .map(variant_arm)
        .collect::<syn::Result<Vec<_>>>()?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// Builds one `Display` match arm from a variant and its message template.
///
/// Only the fields the template references are bound in the pattern; the
/// rest are swallowed by `..` (named fields) or bound to underscore names
/// (tuple fields).
fn variant_arm(variant: &syn::Variant) -> syn::Result<TokenStream2> {
    let template = message_template(variant)?;
    let name = &variant.ident;
    let format = &template.format;

    match &variant.fields {
        Fields::Unit => {
            if let Some(placeholder) = template.placeholders.first() {
                return Err(syn::Error::new_spanned(
                    variant,
                    format!(
                        "variant `{name}` has no fields but its message references `{{{placeholder}}}`"
                    ),
                ));
            }
            Ok(quote! { Self::#name => write!(f, #format), })
        }
        Fields::Named(fields) => {
            let mut bound: Vec<Ident> = Vec::new();
            for placeholder in &template.placeholders {
                let known = fields
                    .named
                    .iter()
                    .any(|field| field.ident.as_ref().is_some_and(|id| id == placeholder));
                if !known {
                    return Err(syn::Error::new_spanned(
                        variant,
                        format!("variant `{name}` has no field `{placeholder}`"),
                    ));
                }
                bound.push(format_ident!("{}", placeholder));
            }
            let args = bound.iter().map(|ident| quote! { #ident = #ident });
            Ok(quote! {
                Self::#name { #(#bound,)* .. } => write!(f, #format, #(#args),*),
            })
        }
        Fields::Unnamed(fields) => {
            let arity = fields.unnamed.len();
            for placeholder in &template.placeholders {
                let in_range = placeholder
                    .parse::<usize>()
                    .map(|index| index < arity)
                    .unwrap_or(false);
                if !in_range {
                    return Err(syn::Error::new_spanned(
                        variant,
                        format!("variant `{name}` has no positional field `{{{placeholder}}}`"),
                    ));
                }
            }
            // Underscore-prefixed slots keep unreferenced fields warning-free.
            let slots: Vec<Ident> = (0..arity).map(|index| format_ident!("_{}", index)).collect();
            let args = template.placeholders.iter().map(|placeholder| {
                let ident = format_ident!("_{}", placeholder);
                quote! { #ident = #ident }
            });
            Ok(quote! {
                Self::#name(#(#slots),*) => write!(f, #format, #(#args),*),
            })
        }
    }
}

/// A message template extracted from `#[error("...")]`.
///
/// `format` is the rewritten string handed to `write!` - positional
/// placeholders are renamed (`{0}` becomes `{_0}`) so every interpolation
/// is a named argument. `placeholders` lists the referenced names in
/// first-use order, deduplicated.
struct Template {
    format: String,
    placeholders: Vec<String>,
}

/// Finds the variant's `#[error("...")]` attribute and parses its template.
fn message_template(variant: &syn::Variant) -> syn::Result<Template> {
    let attr = variant
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("error"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                variant,
                format!(
                    "variant `{}` is missing its #[error(\"...\")] message",
                    variant.ident
                ),
            )
        })?;

    let message: LitStr = attr.parse_args().map_err(|_| {
        syn::Error::new_spanned(attr, "expected a string literal: #[error(\"message\")]")
    })?;

    parse_template(&message)
}

/// Walks the raw message once, copying literal text through and collecting
/// `{...}` placeholders.
fn parse_template(message: &LitStr) -> syn::Result<Template> {
    let raw = message.value();
    let mut format = String::with_capacity(raw.len());
    let mut placeholders: Vec<String> = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                format.push_str("{{");
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                format.push_str("}}");
            }
            '}' => {
                return Err(syn::Error::new_spanned(
                    message,
                    "unmatched `}` in #[error] message (use `}}` for a literal brace)",
                ));
            }
            '{' => {
                let mut name = String::new();
                let mut spec = String::new();
                let mut in_spec = false;
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    if c == ':' && !in_spec {
                        in_spec = true;
                    }
                    if in_spec {
                        spec.push(c);
                    } else {
                        name.push(c);
                    }
                }
                if !closed || name.is_empty() {
                    return Err(syn::Error::new_spanned(
                        message,
                        "malformed placeholder in #[error] message; \
                         reference a field as `{name}` or `{0}`",
                    ));
                }

                // Positional placeholders become named arguments so the
                // generated write! can bind them to pattern identifiers.
                format.push('{');
                if name.chars().all(|c| c.is_ascii_digit()) {
                    format.push('_');
                }
                format.push_str(&name);
                format.push_str(&spec);
                format.push('}');

                if !placeholders.contains(&name) {
                    placeholders.push(name);
                }
            }
            _ => format.push(c),
        }
    }

    Ok(Template {
        format,
        placeholders,
    })
}

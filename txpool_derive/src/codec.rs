//! `#[derive(BinaryCodec)]`: deterministic field-order serialization.
//!
//! The derive only sequences fields: integers, arrays, and length-prefixed
//! containers get their wire form from the pool crate's primitive
//! `Encode`/`Decode` impls. Because fields are always written in
//! declaration order, the output is deterministic and the same bytes feed
//! both the wire and the fingerprint hasher.
//!
//! # Generated Code
//!
//! ```ignore
//! #[derive(BinaryCodec)]
//! pub struct Transfer {
//!     pub nonce: u64,
//!     pub amount: u128,
//! }
//!
//! // expands to
//! impl Encode for Transfer {
//!     fn encode<S: EncodeSink>(&self, out: &mut S) {
//!         Encode::encode(&self.nonce, out);
//!         Encode::encode(&self.amount, out);
//!     }
//! }
//!
//! impl Decode for Transfer {
//!     fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
//!         Ok(Self {
//!             nonce: Decode::decode(input)?,
//!             amount: Decode::decode(input)?,
//!         })
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(&input, "BinaryCodec can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let (encode_body, decode_body) = codec_bodies(&data.fields);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics crate::types::encoding::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                #encode_body
            }
        }

        impl #impl_generics crate::types::encoding::Decode for #name #ty_generics #where_clause {
            fn decode(
                input: &mut &[u8],
            ) -> ::std::result::Result<Self, crate::types::encoding::DecodeError> {
                #decode_body
            }
        }
    };
    expanded.into()
}

/// Returns the statement list for `encode` and the full body expression for
/// `decode`, covering the three struct shapes with one field walk each.
fn codec_bodies(fields: &Fields) -> (TokenStream2, TokenStream2) {
    match fields {
        Fields::Named(fields) => {
            let names: Vec<_> = fields.named.iter().map(|field| &field.ident).collect();
            let encode = quote! {
                #(crate::types::encoding::Encode::encode(&self.#names, out);)*
            };
            let decode = quote! {
                Ok(Self {
                    #(#names: crate::types::encoding::Decode::decode(input)?,)*
                })
            };
            (encode, decode)
        }
        Fields::Unnamed(fields) => {
            let indices: Vec<syn::Index> =
                (0..fields.unnamed.len()).map(syn::Index::from).collect();
            let reads = indices
                .iter()
                .map(|_| quote! { crate::types::encoding::Decode::decode(input)?, });
            let encode = quote! {
                #(crate::types::encoding::Encode::encode(&self.#indices, out);)*
            };
            let decode = quote! { Ok(Self(#(#reads)*)) };
            (encode, decode)
        }
        // Nothing to write or read, but the parameters must still count as
        // used in the generated impls.
        Fields::Unit => (
            quote! { let _ = out; },
            quote! {
                let _ = input;
                Ok(Self)
            },
        ),
    }
}

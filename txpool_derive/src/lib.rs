//! Procedural macros backing the pool's canonical codec and error types.
//!
//! Two derives are exported:
//!
//! - [`BinaryCodec`](macro@BinaryCodec) implements the pool crate's
//!   `Encode`/`Decode` traits for structs, writing fields in declaration
//!   order so the encoding is deterministic and usable for fingerprint
//!   hashing.
//! - [`Error`](macro@Error) implements `Display` and `std::error::Error`
//!   for error enums from `#[error("...")]` message templates.
//!
//! Both derives are deliberately narrow. The pool's wire types are all
//! structs and its error types are all enums, so anything else is rejected
//! with a compile error instead of half-supported.

mod codec;
mod display;

use proc_macro::TokenStream;

/// Implements `Encode` and `Decode` for a struct.
///
/// The generated code serializes every field in declaration order using
/// the pool crate's little-endian binary format and reads them back the
/// same way. Named, tuple, and unit structs are supported; enums are not.
#[proc_macro_derive(BinaryCodec, attributes(binary_codec))]
pub fn derive_binary_codec(input: TokenStream) -> TokenStream {
    codec::expand(input)
}

/// Implements `Display` and `std::error::Error` for an error enum.
///
/// Every variant carries an `#[error("...")]` message template. Templates
/// reference variant fields by name (`{nonce}`) or by position (`{0}`),
/// may carry format specs (`{0:x}`), and may leave fields unmentioned.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    display::expand(input)
}

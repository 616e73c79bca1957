use proc_macro::TokenStream as StdTokenStream;
use syn::DeriveInput;

mod args;
mod pack_impl;

/// Implements `Pack` for a struct.
///
/// Only `pub` fields are packed, in declaration order. Private and restricted
/// (`pub(crate)` etc.) fields are neither written nor touched when decoding.
///
/// # Attributes
///
/// - `#[pack(skip)]` on a field excludes it, even if it is `pub`.
/// - `#[pack(flatten)]` on a field splices the fields of that record in place
///   of the field, without any framing. This applies regardless of the
///   field's own visibility. The field must hold the record by value or as a
///   `Box<T>`, where `T` itself derives `Pack`. `Option<Box<T>>` can't be
///   flattened.
/// - `#[pack(crate = path)]` on the struct sets the path to the `packer`
///   crate, in case it was renamed.
///
/// Enums and unions are not supported.
#[proc_macro_derive(Pack, attributes(pack))]
pub fn derive_pack(input: StdTokenStream) -> StdTokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    pack_impl::entry_point(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

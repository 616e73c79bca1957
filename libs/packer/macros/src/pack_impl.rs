use darling::FromDeriveInput as _;
use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens as _;
use syn::ext::IdentExt as _;
use syn::{GenericArgument, Ident, Index, Member, PathArguments, Type, WherePredicate};

use crate::args::PackArgs;

pub fn entry_point(input: &syn::DeriveInput) -> darling::Result<TokenStream> {
    let args = PackArgs::from_derive_input(input)?;

    if let Some(lifetime) = args.generics.lifetimes().next() {
        return Err(
            darling::Error::custom("Pack cannot be derived for types with lifetime parameters")
                .with_span(lifetime),
        );
    }

    let Some(fields) = args.data.as_ref().take_struct() else {
        return Err(darling::Error::unsupported_shape("enum"));
    };

    let crate_ = args
        .crate_
        .clone()
        .unwrap_or_else(|| syn::parse_quote!(::packer));

    let type_params: Vec<&Ident> = args.generics.type_params().map(|p| &p.ident).collect();

    let mut steps = Vec::new();
    let mut bounds: Vec<WherePredicate> = type_params
        .iter()
        .map(|param| syn::parse_quote!(#param: 'static))
        .collect();

    for (index, field) in fields.fields.into_iter().enumerate() {
        if !field.is_packed() {
            continue;
        }

        let (member, name) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (Member::Unnamed(Index::from(index)), index.to_string()),
        };

        let ty = &field.ty;
        let generic = mentions_any(ty, &type_params);

        if field.flatten.is_present() {
            let embedded = match boxed_type(ty) {
                Some(inner) => {
                    steps.push(quote::quote! {
                        .flatten::<#inner>(#name, |v| &*v.#member, |v| &mut *v.#member)?
                    });
                    inner
                },
                None => {
                    steps.push(quote::quote! {
                        .flatten::<#ty>(#name, |v| &v.#member, |v| &mut v.#member)?
                    });
                    ty
                },
            };
            if generic {
                bounds.push(syn::parse_quote! {
                    #embedded: #crate_::Pack<Codec = #crate_::StructCodec<#embedded>>
                });
            }
        } else {
            steps.push(quote::quote! {
                .field::<#ty>(#name, |v| &v.#member, |v| &mut v.#member)?
            });
            if generic {
                bounds.push(syn::parse_quote!(#ty: #crate_::Pack));
            }
        }
    }

    let mut generics = args.generics.clone();
    generics.make_where_clause().predicates.extend(bounds);

    let ty_name = &args.ident;
    let (impl_gen, ty_gen, where_clause) = generics.split_for_impl();

    Ok(quote::quote! {
        #[automatically_derived]
        impl #impl_gen #crate_::Pack for #ty_name #ty_gen #where_clause {
            type Codec = #crate_::StructCodec<Self>;

            fn build_codec(
                builder: &mut #crate_::Builder<'_>,
            ) -> #crate_::Result<Self::Codec> {
                ::std::result::Result::Ok(
                    #crate_::StructCodec::<Self>::builder(builder)
                        #( #steps )*
                        .finish()
                )
            }
        }
    })
}

/// The pointee of a `Box<T>` field type.
///
/// Matched by the last path segment, so `std::boxed::Box<T>` works too.
fn boxed_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }

    let last = path.path.segments.last()?;
    if last.ident != "Box" {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Whether the type refers to any of the generic type parameters.
///
/// Only those field types get a where-clause. Bounding concrete field types
/// would make records that contain themselves fail to compile instead of
/// being rejected when their codec is built.
fn mentions_any(ty: &Type, params: &[&Ident]) -> bool {
    fn visit(tokens: TokenStream, params: &[&Ident]) -> bool {
        tokens.into_iter().any(|tt| match tt {
            TokenTree::Ident(ident) => params.iter().any(|p| ident == **p),
            TokenTree::Group(group) => visit(group.stream(), params),
            _ => false,
        })
    }

    !params.is_empty() && visit(ty.to_token_stream(), params)
}

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Path};

#[derive(Default)]
struct UnitArgs {
    register: Option<LitStr>,
    registered: bool,
    implements: Vec<Path>,
    is_abstract: bool,
    hidden: bool,
}

impl UnitArgs {
    fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let mut args = Self::default();

        for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("unit")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("register") {
                    args.registered = true;
                    if meta.input.peek(syn::Token![=]) {
                        args.register = Some(meta.value()?.parse()?);
                    }
                    Ok(())
                } else if meta.path.is_ident("implements") {
                    meta.parse_nested_meta(|inner| {
                        args.implements.push(inner.path);
                        Ok(())
                    })
                } else if meta.path.is_ident("abstract") {
                    args.is_abstract = true;
                    Ok(())
                } else if meta.path.is_ident("hidden") {
                    args.hidden = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `register`, `implements(..)`, `abstract` or `hidden`"))
                }
            })?;
        }

        Ok(args)
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "Unit cannot be derived for generic types")
            .to_compile_error();
    }

    let args = match UnitArgs::parse(&input) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };

    let name = &input.ident;

    let constructor = if args.is_abstract {
        quote! { ::tilt_kernel::UnitDescriptor::abstract_of::<Self>() }
    } else {
        quote! { ::tilt_kernel::UnitDescriptor::of::<Self>() }
    };

    let registration = args.registered.then(|| {
        let value = args.register.as_ref().map_or_else(|| quote! { "" }, |lit| quote! { #lit });
        quote! { .register_as(#value) }
    });

    let hidden = args.hidden.then(|| quote! { .hidden() });

    let bases = &args.implements;
    let implements = bases.iter().map(|base| quote! { .implements::<dyn #base>() });

    let assertions = (!bases.is_empty()).then(|| {
        quote! {
            const _: () = {
                fn assert_implements<T: ?Sized + #(#bases)+*>() {}
                #[allow(dead_code)]
                fn check() {
                    assert_implements::<#name>();
                }
            };
        }
    });

    quote! {
        #[automatically_derived]
        impl ::tilt_kernel::Unit for #name {
            fn descriptor() -> ::tilt_kernel::UnitDescriptor {
                #constructor
                    #registration
                    #hidden
                    #(#implements)*
            }
        }

        #assertions
    }
}

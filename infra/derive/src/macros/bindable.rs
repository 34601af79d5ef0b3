use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Type, Visibility};

/// How a single struct field takes part in binding.
enum FieldRole {
    Plain,
    Configurable { key: Option<LitStr> },
    Hardware { name: Option<LitStr> },
    Flatten,
    Skip,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "Bindable can only be derived for structs")
            .to_compile_error();
    };
    let fields: Vec<&Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return syn::Error::new_spanned(&input.ident, "Bindable requires named fields")
                .to_compile_error();
        },
    };

    let owner = input.ident.to_string();
    let mut entries = Vec::new();
    let mut capabilities = Vec::new();

    for field in fields {
        let role = match field_role(field) {
            Ok(role) => role,
            Err(err) => return err.to_compile_error(),
        };
        let Some(ident) = &field.ident else { continue };
        let ty = &field.ty;

        match role {
            FieldRole::Skip => {},
            FieldRole::Flatten => {
                entries.push(quote! {
                    fields.extend(::tilt_binder::Bindable::fields(&mut self.#ident));
                });
                capabilities.push(quote! { <#ty as ::tilt_binder::Bindable>::capabilities().bits() });
            },
            FieldRole::Hardware { name } => {
                let name = optional_str(name.as_ref());
                entries.push(field_entry(
                    &owner,
                    field,
                    quote! { Some(::tilt_binder::Marker::Hardware { name: #name }) },
                    device_slot(ident, ty),
                ));
                capabilities.push(quote! { ::tilt_binder::Capabilities::HARDWARE.bits() });
            },
            FieldRole::Configurable { key } => {
                let key = optional_str(key.as_ref());
                entries.push(field_entry(
                    &owner,
                    field,
                    quote! { Some(::tilt_binder::Marker::Configurable { key: #key }) },
                    primitive_slot(ident, ty),
                ));
                capabilities.push(quote! { ::tilt_binder::Capabilities::CONFIGURABLE.bits() });
            },
            FieldRole::Plain => {
                entries.push(field_entry(&owner, field, quote! { None }, primitive_slot(ident, ty)));
            },
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        #[automatically_derived]
        impl #impl_generics ::tilt_binder::Bindable for #name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::tilt_binder::Field<'_>> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                #(#entries)*
                fields
            }

            fn capabilities() -> ::tilt_binder::Capabilities
            where
                Self: Sized,
            {
                ::tilt_binder::Capabilities::from_bits_retain(0 #(| #capabilities)*)
            }
        }
    }
}

fn field_entry(owner: &str, field: &Field, marker: TokenStream, slot: TokenStream) -> TokenStream {
    let name = field.ident.as_ref().map(ToString::to_string).unwrap_or_default();
    let declared = type_label(&field.ty);
    let public = matches!(field.vis, Visibility::Public(_));

    quote! {
        fields.push(::tilt_binder::Field {
            owner: #owner,
            name: #name,
            declared_type: #declared,
            public: #public,
            marker: #marker,
            slot: #slot,
        });
    }
}

/// Picks a typed slot by the field's spelled type; anything else is unsupported.
fn primitive_slot(ident: &syn::Ident, ty: &Type) -> TokenStream {
    match plain_type_name(ty).as_deref() {
        Some("bool") => quote! { ::tilt_binder::Slot::Boolean(&mut self.#ident) },
        Some("i32") => quote! { ::tilt_binder::Slot::Integer(&mut self.#ident) },
        Some("f64") => quote! { ::tilt_binder::Slot::Double(&mut self.#ident) },
        Some("String") => quote! { ::tilt_binder::Slot::Text(&mut self.#ident) },
        _ => quote! { ::tilt_binder::Slot::Unsupported },
    }
}

/// Device fields must be `Option<..>`; the binder checks the inner type at runtime.
fn device_slot(ident: &syn::Ident, ty: &Type) -> TokenStream {
    let is_option = match ty {
        Type::Path(path) => path.path.segments.last().is_some_and(|s| s.ident == "Option"),
        _ => false,
    };
    if is_option {
        quote! { ::tilt_binder::Slot::Device(&mut self.#ident as &mut dyn ::tilt_binder::DeviceSlot) }
    } else {
        quote! { ::tilt_binder::Slot::Unsupported }
    }
}

fn plain_type_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    segment.arguments.is_none().then(|| segment.ident.to_string())
}

fn type_label(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}

fn optional_str(value: Option<&LitStr>) -> TokenStream {
    value.map_or_else(|| quote! { None }, |lit| quote! { Some(#lit) })
}

fn field_role(field: &Field) -> syn::Result<FieldRole> {
    let mut role = FieldRole::Plain;

    for attr in &field.attrs {
        if attr.path().is_ident("configurable") {
            let mut key = None;
            if !matches!(attr.meta, syn::Meta::Path(_)) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("key") {
                        key = Some(meta.value()?.parse::<LitStr>()?);
                        Ok(())
                    } else {
                        Err(meta.error("expected `key = \"...\"`"))
                    }
                })?;
            }
            role = exclusive(role, FieldRole::Configurable { key }, attr)?;
        } else if attr.path().is_ident("hardware") {
            let mut name = None;
            if !matches!(attr.meta, syn::Meta::Path(_)) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        name = Some(meta.value()?.parse::<LitStr>()?);
                        Ok(())
                    } else {
                        Err(meta.error("expected `name = \"...\"`"))
                    }
                })?;
            }
            role = exclusive(role, FieldRole::Hardware { name }, attr)?;
        } else if attr.path().is_ident("bindable") {
            let mut parsed = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("flatten") {
                    parsed = Some(FieldRole::Flatten);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    parsed = Some(FieldRole::Skip);
                    Ok(())
                } else {
                    Err(meta.error("expected `flatten` or `skip`"))
                }
            })?;
            if let Some(parsed) = parsed {
                role = exclusive(role, parsed, attr)?;
            }
        }
    }

    Ok(role)
}

fn exclusive(current: FieldRole, next: FieldRole, attr: &syn::Attribute) -> syn::Result<FieldRole> {
    if matches!(current, FieldRole::Plain) {
        Ok(next)
    } else {
        Err(syn::Error::new_spanned(attr, "a field can carry only one binding attribute"))
    }
}

use proc_macro::TokenStream;
use syn::{DeriveInput, Fields, Variant};

// unit variants convert from a type of the same name, single-field tuple
// variants from their field type, anything else is left alone
fn impl_variant(ident: &syn::Ident, variant: &Variant) -> Option<proc_macro2::TokenStream> {
    let name = &variant.ident;
    match &variant.fields {
        Fields::Unit => Some(quote::quote! {
            impl From<#name> for #ident {
                fn from (_e: #name) -> Self {
                    #ident::#name
                }
            }
        }),
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            let ty = &fields.unnamed[0].ty;
            Some(quote::quote! {
                impl From<#ty> for #ident {
                    fn from (e: #ty) -> Self {
                        #ident::#name(e)
                    }
                }
            })
        }
        _ => None,
    }
}

fn impl_from_trait(ast: DeriveInput) -> TokenStream {
    let ident = ast.ident;

    let variants: Vec<Variant> = match ast.data {
        syn::Data::Struct(_) => panic!("Structs are not supported by From"),
        syn::Data::Enum(data) => data.variants.into_iter().collect(),
        syn::Data::Union(_) => panic!("Unions are not supported by From"),
    };

    let mut tokens = quote::quote!();
    for variant in variants.iter() {
        if let Some(impl_tokens) = impl_variant(&ident, variant) {
            tokens.extend(impl_tokens);
        }
    }
    tokens.into()
}

#[proc_macro_derive(From)]
pub fn from_derive_macro(item: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(item as DeriveInput);
    impl_from_trait(ast)
}

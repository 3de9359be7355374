use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStruct;

pub fn expand(input: ItemStruct) -> TokenStream {
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "shared_handle does not support generic structs; write the wrapper by hand",
        )
        .to_compile_error();
    }

    let handle = &input.ident;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let fields = &input.fields;
    let semi = input.semi_token;
    let state = format_ident!("{handle}State");

    quote! {
        #(#attrs)*
        #[derive(Debug)]
        #vis struct #state #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #handle {
            state: std::sync::Arc<#state>,
        }

        impl #handle {
            /// Wraps the state into a cheaply cloneable handle.
            #[must_use]
            pub fn from_state(state: #state) -> Self {
                Self { state: std::sync::Arc::new(state) }
            }

            /// Whether two handles point at the same underlying state.
            #[must_use]
            pub fn same_as(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.state, &other.state)
            }
        }

        impl std::ops::Deref for #handle {
            type Target = #state;

            fn deref(&self) -> &Self::Target {
                &self.state
            }
        }
    }
}

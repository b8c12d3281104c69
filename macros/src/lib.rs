use proc_macro::TokenStream;

mod derive;

#[proc_macro_derive(Tagged, attributes(tagged))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    derive::expand_tagged(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

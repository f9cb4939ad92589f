use proc_macro::TokenStream;
use quote::ToTokens;
use syn::{DeriveInput, parse_macro_input};

mod from_frame;

#[proc_macro_derive(FromFrame, attributes(code))]
pub fn derive_from_frame(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_frame::expand_from_frame(&input) {
        Ok(tokens) => tokens.into_token_stream().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

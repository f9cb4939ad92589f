use std::collections::HashMap;

use quote::{ToTokens, format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitInt, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_frame(input: &DeriveInput) -> Result<impl ToTokens + use<>> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromFrame` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromFrame` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    type Case = (LitInt, Ident, Option<(Type, ExprClosure)>);
    let mut methods: HashMap<Ident, (Type, HashMap<u8, Case>)> = HashMap::new();

    for field in fields {
        let code = field.code.base10_parse::<u8>()?;

        let expected = method_for_code(code);

        if field.method != expected {
            let message = format!(
                "Code {code:#04x} is published with `{expected}`, not `{}`.",
                field.method
            );

            Err(Error::new(field.code.span(), message))?
        }

        let (_, cases) = methods
            .entry(field.method)
            .or_insert_with(|| (field.primitive, HashMap::new()));

        let existing = cases.insert(code, (field.code.clone(), field.name, field.handler));

        if existing.is_some() {
            Err(Error::new(
                field.code.span(),
                "Codes must be unique for each primitive.",
            ))?
        }
    }

    let methods = methods.into_iter().map(|(method, (primitive, cases))| {
        let cases = cases.into_values().map(|(code, name, handler)| {
            let assignment = if let Some((field_type, handler)) = handler {
                let body = handler.body;
                let acc = &handler.inputs[0];
                let val = &handler.inputs[1];

                quote! {
                    (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
                }
            } else {
                quote! {
                    self.#name = Some(value)
                }
            };

            quote! { #code => { #assignment } }
        });

        quote! {
            fn #method(&mut self, code: u8, value: #primitive) {
                match code {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromFrame for #name {
            #(#methods)*
        }
    };

    Ok(expanded)
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    primitive: Type,
    method: Ident,
    code: LitInt,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("code")) else {
            return Ok(None);
        };

        let CodeAttribute { code, handler } = attr.meta.require_list()?.parse_args()?;

        let primitive = if let Some(handler) = &handler {
            if handler.inputs.len() != 2 {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            }

            let parameter = &handler.inputs[1];

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected primitive type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            let Type::Path(path) = &field.ty else {
                Err(Error::new_spanned(
                    &field.ty,
                    "Field must have a type annotation.",
                ))?
            };

            let Some(segment) = path.path.segments.last() else {
                Err(Error::new_spanned(
                    &path.path.segments,
                    "Field must have a type annotation.",
                ))?
            };

            if segment.ident != "Option" {
                Err(Error::new_spanned(
                    &segment.ident,
                    "Field without a handler must have type `Option<T>`.",
                ))?
            }

            let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
                Err(Error::new_spanned(
                    &segment.arguments,
                    "Field of type `Option<T>` must have a generic parameter.",
                ))?
            };

            let Some(argument) = arguments.args.first() else {
                Err(Error::new_spanned(
                    &arguments.args,
                    "Field of type `Option<T>` must have a generic parameter.",
                ))?
            };

            let GenericArgument::Type(inner_type) = argument else {
                Err(Error::new_spanned(
                    argument,
                    "Generic argument of a field of type `Option<T>` must be a type.",
                ))?
            };

            inner_type.clone()
        };

        let method = method_for(&primitive)?;
        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            primitive,
            method,
            code,
            handler,
        }))
    }
}

/// Find the receiver method publishing values of a primitive.
fn method_for(primitive: &Type) -> Result<Ident> {
    let unsupported = || {
        Error::new_spanned(
            primitive,
            "Primitive must be one of `u8`, `i16`, `u16`, `EegPower`, or `AsicEegPower`.",
        )
    };

    let Type::Path(path) = primitive else {
        Err(unsupported())?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(unsupported())?
    };

    let method = match segment.ident.to_string().as_str() {
        "u8" => "add_u8",
        "i16" => "add_i16",
        "u16" => "add_u16",
        "EegPower" => "add_eeg_power",
        "AsicEegPower" => "add_asic_eeg_power",
        _ => Err(unsupported())?,
    };

    Ok(format_ident!("{}", method))
}

/// Find the receiver method a code is published to.
fn method_for_code(code: u8) -> &'static str {
    match code {
        0x80 => "add_i16",
        0x81 => "add_eeg_power",
        0x83 => "add_asic_eeg_power",
        0x86 => "add_u16",
        _ => "add_u8",
    }
}

#[derive(Debug)]
struct CodeAttribute {
    code: LitInt,
    handler: Option<ExprClosure>,
}

impl Parse for CodeAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let code = input.parse::<LitInt>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { code, handler })
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn expand(input: DeriveInput) -> Result<()> {
        expand_from_frame(&input).map(drop)
    }

    #[test]
    fn matching_primitives_are_accepted() {
        let input = parse_quote! {
            struct Reading {
                #[code(0x04)]
                attention: Option<u8>,
                #[code(0x80, |v, x: i16| v.push(x))]
                wave: Vec<i16>,
                #[code(0x83)]
                bands: Option<AsicEegPower>,
                #[code(0x86)]
                rr_interval: Option<u16>,
            }
        };

        assert!(expand(input).is_ok());
    }

    #[test]
    fn mismatched_primitives_are_rejected() {
        let input = parse_quote! {
            struct Reading {
                #[code(0x80)]
                raw: Option<u8>,
            }
        };

        let err = expand(input).unwrap_err();
        assert_eq!(err.to_string(), "Code 0x80 is published with `add_i16`, not `add_u8`.");

        let input = parse_quote! {
            struct Reading {
                #[code(0x02, |v, x: i16| *v = x)]
                poor_signal: i16,
            }
        };

        assert!(expand(input).is_err());
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let input = parse_quote! {
            struct Reading {
                #[code(0x04)]
                attention: Option<u8>,
                #[code(0x04)]
                focus: Option<u8>,
            }
        };

        assert!(expand(input).is_err());
    }
}

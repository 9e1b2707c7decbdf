// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, FnArg, GenericArgument, Ident, Item, ItemTrait, LitBool, LitStr,
    Meta, Pat, PathArguments, ReturnType, TraitItem, TraitItemFn, Type,
};

/// Name given to the Out parameter that carries a method's return value.
const RETURN_PARAM_NAME: &str = "retVal";

/// `#[pattern(...)]` on a provider trait: generates its `ProviderContract`.
///
/// Keys:
/// - `name = "..."` - programmatic pattern name (default: the trait name with
///   a trailing `Provider` replaced by `Pattern`)
/// - `guid = "..."` - pattern guid
/// - `provider_iid = "..."` - provider interface id
/// - `event(name = "...", guid = "...")` - one pattern event, repeatable
///
/// Members:
/// - `#[property(guid = "...", name = "...")]` on `fn x(&self) -> Result<T, E>`
/// - `#[method(focus, name = "...")]` on `fn m(&self, a: T, b: &mut U) -> Result<R, E>`
///
/// Method parameters taken by value are In, `&mut` parameters are Out, and a
/// non-unit return value becomes a trailing Out parameter. Members without
/// either attribute are not part of the pattern.
///
/// Example:
/// ```ignore
/// use uia_pattern::{pattern, ProviderError};
///
/// #[pattern(
///     guid = "E69F099B-7519-4CE7-9D61-77146DCB1B4A",
///     provider_iid = "965D7E12-F5F5-42F9-9D72-75AAA7AE8FFD",
/// )]
/// pub trait TestProvider {
///     #[property(guid = "DD339FFB-E244-41A2-A8A2-787F722C582B")]
///     fn bool_property(&self) -> Result<bool, ProviderError>;
///
///     #[method]
///     fn bool_method_with_in_and_out_params(
///         &self,
///         int_in: i32,
///         string_out: &mut String,
///     ) -> Result<bool, ProviderError>;
/// }
/// ```
#[proc_macro_attribute]
pub fn pattern(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = PatternArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(&meta));
    parse_macro_input!(attr with parser);
    let mut item = parse_macro_input!(item as ItemTrait);

    match expand_pattern(&args, &mut item) {
        Ok(contract) => quote! {
            #item
            #contract
        }
        .into(),
        Err(e) => {
            let error = e.to_compile_error();
            strip_member_attrs(&mut item);
            quote! {
                #item
                #error
            }
            .into()
        }
    }
}

/// `#[pattern_client(iid = "...")]` on a client trait or type: generates its
/// `ClientContract`.
///
/// On a trait the contract is implemented for `dyn Trait`. Without `iid` the
/// interface id is `None`, which the schema builder rejects.
#[proc_macro_attribute]
pub fn pattern_client(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut iid: Option<u128> = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("iid") {
            iid = Some(parse_guid_lit(&meta.value()?.parse()?)?);
            Ok(())
        } else {
            Err(meta.error("unsupported pattern_client key, expected `iid`"))
        }
    });
    parse_macro_input!(attr with parser);
    let item = parse_macro_input!(item as Item);

    let target = match &item {
        Item::Trait(t) if t.generics.params.is_empty() => {
            let ident = &t.ident;
            quote!(dyn #ident)
        }
        Item::Struct(s) if s.generics.params.is_empty() => {
            let ident = &s.ident;
            quote!(#ident)
        }
        Item::Enum(e) if e.generics.params.is_empty() => {
            let ident = &e.ident;
            quote!(#ident)
        }
        _ => {
            return syn::Error::new_spanned(
                &item,
                "pattern_client applies to a non-generic trait, struct or enum",
            )
            .to_compile_error()
            .into()
        }
    };
    let iid = optional_guid(iid);

    quote! {
        #item

        impl ::uia_pattern::ClientContract for #target {
            const INTERFACE_ID: ::core::option::Option<::uia_pattern::Guid> = #iid;
        }
    }
    .into()
}

#[derive(Default)]
struct PatternArgs {
    name: Option<LitStr>,
    guid: Option<u128>,
    provider_iid: Option<u128>,
    events: Vec<(LitStr, u128)>,
}

impl PatternArgs {
    fn parse(&mut self, meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("guid") {
            self.guid = Some(parse_guid_lit(&meta.value()?.parse()?)?);
        } else if meta.path.is_ident("provider_iid") {
            self.provider_iid = Some(parse_guid_lit(&meta.value()?.parse()?)?);
        } else if meta.path.is_ident("event") {
            let mut name: Option<LitStr> = None;
            let mut guid: Option<u128> = None;
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("name") {
                    name = Some(inner.value()?.parse()?);
                    Ok(())
                } else if inner.path.is_ident("guid") {
                    guid = Some(parse_guid_lit(&inner.value()?.parse()?)?);
                    Ok(())
                } else {
                    Err(inner.error("unsupported event key, expected `name` or `guid`"))
                }
            })?;
            match (name, guid) {
                (Some(name), Some(guid)) => self.events.push((name, guid)),
                _ => return Err(meta.error("event requires both `name` and `guid`")),
            }
        } else {
            return Err(meta.error(
                "unsupported pattern key, expected `name`, `guid`, `provider_iid` or `event`",
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MemberArgs {
    name: Option<LitStr>,
    guid: Option<u128>,
    focus: bool,
}

enum MemberKind {
    Property,
    Method,
}

fn member_kind(attr: &Attribute) -> Option<MemberKind> {
    if attr.path().is_ident("property") {
        Some(MemberKind::Property)
    } else if attr.path().is_ident("method") {
        Some(MemberKind::Method)
    } else {
        None
    }
}

fn parse_member_args(attr: &Attribute, kind: &MemberKind) -> syn::Result<MemberArgs> {
    let mut args = MemberArgs::default();
    if let Meta::Path(_) = attr.meta {
        return Ok(args);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            args.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("guid") && matches!(kind, MemberKind::Property) {
            args.guid = Some(parse_guid_lit(&meta.value()?.parse()?)?);
            Ok(())
        } else if meta.path.is_ident("focus") && matches!(kind, MemberKind::Method) {
            args.focus = if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<LitBool>()?.value
            } else {
                true
            };
            Ok(())
        } else {
            Err(meta.error("unsupported member key"))
        }
    })?;
    Ok(args)
}

/// Remove the member attributes, which are only markers for this macro.
fn strip_member_attrs(item: &mut ItemTrait) {
    for trait_item in &mut item.items {
        if let TraitItem::Fn(f) = trait_item {
            f.attrs.retain(|attr| member_kind(attr).is_none());
        }
    }
}

fn expand_pattern(args: &PatternArgs, item: &mut ItemTrait) -> syn::Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "pattern provider traits cannot be generic",
        ));
    }

    let trait_ident = item.ident.clone();
    let provider = quote!((dyn #trait_ident + 'static));

    let mut bindings = Vec::new();
    let mut members = Vec::new();
    for trait_item in &mut item.items {
        let TraitItem::Fn(f) = trait_item else {
            continue;
        };
        let Some((kind, attr)) = take_member_attr(f)? else {
            continue;
        };
        let member_args = parse_member_args(&attr, &kind)?;
        let (binding, member) = match kind {
            MemberKind::Property => expand_property(f, &member_args, &provider)?,
            MemberKind::Method => expand_method(f, &member_args, &provider)?,
        };
        bindings.push(binding);
        members.push(member);
    }

    let name = args
        .name
        .as_ref()
        .map_or_else(|| default_pattern_name(&trait_ident), LitStr::value);
    let pattern_guid = optional_guid(args.guid);
    let provider_iid = optional_guid(args.provider_iid);
    let events = args.events.iter().map(|(name, guid)| {
        let guid = guid_tokens(*guid);
        quote! {
            ::uia_pattern::ContractEvent { name: #name, guid: #guid }
        }
    });

    Ok(quote! {
        impl ::uia_pattern::ProviderContract for dyn #trait_ident {
            fn contract() -> ::uia_pattern::ContractTable<Self> {
                #(#bindings)*

                ::uia_pattern::ContractTable {
                    name: #name,
                    pattern_guid: #pattern_guid,
                    provider_iid: #provider_iid,
                    members: ::std::vec![#(#members),*],
                    events: ::std::vec![#(#events),*],
                }
            }
        }
    })
}

/// Detach the single member attribute from `f`, if present.
fn take_member_attr(f: &mut TraitItemFn) -> syn::Result<Option<(MemberKind, Attribute)>> {
    let mut found: Option<(MemberKind, Attribute)> = None;
    let mut kept = Vec::with_capacity(f.attrs.len());
    for attr in f.attrs.drain(..) {
        match member_kind(&attr) {
            Some(_) if found.is_some() => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "a member is either one property or one method",
                ))
            }
            Some(kind) => found = Some((kind, attr)),
            None => kept.push(attr),
        }
    }
    f.attrs = kept;
    Ok(found)
}

fn expand_property(
    f: &TraitItemFn,
    args: &MemberArgs,
    provider: &TokenStream2,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    check_signature(f)?;
    if f.sig.inputs.len() != 1 {
        return Err(syn::Error::new_spanned(
            &f.sig.inputs,
            "a pattern property takes no arguments besides &self",
        ));
    }
    let Some(guid) = args.guid else {
        return Err(syn::Error::new_spanned(
            &f.sig.ident,
            "a pattern property needs `guid = \"...\"`",
        ));
    };

    let Some(ret) = return_shape(&f.sig.output) else {
        return Err(syn::Error::new_spanned(
            &f.sig,
            "a pattern property must return a value",
        ));
    };
    let Some(value_ty) = ret.value else {
        return Err(syn::Error::new_spanned(
            &f.sig.output,
            "a pattern property must return a value",
        ));
    };

    let ident = &f.sig.ident;
    let getter = format_ident!("__uia_get_{}", ident);
    let name = member_name(args, ident);
    let guid = guid_tokens(guid);
    let question = ret.fallible.then(|| quote!(?));

    let binding = quote! {
        fn #getter(
            provider: &#provider,
        ) -> ::core::result::Result<::uia_pattern::ParamValue, ::uia_pattern::DispatchError> {
            let value: #value_ty = provider.#ident()#question;
            ::core::result::Result::Ok(::uia_pattern::WireValue::into_param(value))
        }
    };
    let member = quote! {
        ::uia_pattern::ContractMember::Property(::uia_pattern::PropertyContract {
            name: #name,
            guid: #guid,
            value_type: <#value_ty as ::uia_pattern::NativeTyped>::NATIVE_TYPE,
            getter: #getter,
        })
    };
    Ok((binding, member))
}

fn expand_method(
    f: &TraitItemFn,
    args: &MemberArgs,
    provider: &TokenStream2,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    check_signature(f)?;

    let ident = &f.sig.ident;
    let invoker = format_ident!("__uia_call_{}", ident);
    let name = member_name(args, ident);
    let focus = args.focus;

    let mut params = Vec::new();
    let mut prologue = Vec::new();
    let mut call_args = Vec::new();
    let mut outputs = Vec::new();
    let mut in_position = 0usize;

    for (i, input) in f.sig.inputs.iter().skip(1).enumerate() {
        let FnArg::Typed(arg) = input else {
            return Err(syn::Error::new_spanned(input, "unexpected receiver"));
        };
        let param_name = match &*arg.pat {
            Pat::Ident(p) => unraw(&p.ident),
            _ => format!("arg{i}"),
        };
        let local = format_ident!("__uia_arg{}", i);

        match &*arg.ty {
            Type::Reference(r) if r.mutability.is_some() => {
                let ty = &r.elem;
                params.push(quote! {
                    ::uia_pattern::ContractParam::output(
                        #param_name,
                        <#ty as ::uia_pattern::NativeTyped>::NATIVE_TYPE,
                    )
                });
                prologue.push(quote! {
                    let mut #local: #ty = ::core::default::Default::default();
                });
                call_args.push(quote!(&mut #local));
                outputs.push(quote!(::uia_pattern::WireValue::into_param(#local)));
            }
            Type::Reference(r) => {
                return Err(syn::Error::new_spanned(
                    r,
                    "pass In parameters by value and Out parameters as `&mut`",
                ))
            }
            ty => {
                let position = in_position;
                in_position += 1;
                params.push(quote! {
                    ::uia_pattern::ContractParam::input(
                        #param_name,
                        <#ty as ::uia_pattern::NativeTyped>::NATIVE_TYPE,
                    )
                });
                prologue.push(quote! {
                    let #local: #ty = ::uia_pattern::next_arg(&mut args, #position)?;
                });
                call_args.push(quote!(#local));
            }
        }
    }

    let ret = return_shape(&f.sig.output).unwrap_or(ReturnShape {
        value: None,
        fallible: false,
    });
    let question = ret.fallible.then(|| quote!(?));
    let call = if let Some(ty) = &ret.value {
        params.push(quote! {
            ::uia_pattern::ContractParam::output(
                #RETURN_PARAM_NAME,
                <#ty as ::uia_pattern::NativeTyped>::NATIVE_TYPE,
            )
        });
        outputs.push(quote!(::uia_pattern::WireValue::into_param(__uia_ret)));
        quote! {
            let __uia_ret: #ty = provider.#ident(#(#call_args),*)#question;
        }
    } else {
        quote! {
            provider.#ident(#(#call_args),*)#question;
        }
    };
    let args_binding = if in_position == 0 {
        quote!(let _ = args;)
    } else {
        quote!(let mut args = args.into_iter();)
    };

    let binding = quote! {
        fn #invoker(
            provider: &#provider,
            args: ::std::vec::Vec<::uia_pattern::ParamValue>,
        ) -> ::core::result::Result<
            ::std::vec::Vec<::uia_pattern::ParamValue>,
            ::uia_pattern::DispatchError,
        > {
            #args_binding
            #(#prologue)*
            #call
            ::core::result::Result::Ok(::std::vec![#(#outputs),*])
        }
    };
    let member = quote! {
        ::uia_pattern::ContractMember::Method(::uia_pattern::MethodContract {
            name: #name,
            do_set_focus: #focus,
            params: ::std::vec![#(#params),*],
            invoker: #invoker,
        })
    };
    Ok((binding, member))
}

fn check_signature(f: &TraitItemFn) -> syn::Result<()> {
    if !f.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &f.sig.generics,
            "pattern members cannot be generic",
        ));
    }
    if f.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &f.sig.asyncness,
            "pattern members cannot be async",
        ));
    }
    match f.sig.inputs.first() {
        Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none() => Ok(()),
        _ => Err(syn::Error::new_spanned(
            &f.sig,
            "pattern members take `&self`",
        )),
    }
}

struct ReturnShape {
    /// Value type, `None` for unit.
    value: Option<Type>,
    /// Whether the member returns `Result<_, _>`.
    fallible: bool,
}

fn return_shape(output: &ReturnType) -> Option<ReturnShape> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    if let Some(inner) = result_ok_type(ty) {
        return Some(ReturnShape {
            value: (!is_unit(inner)).then(|| inner.clone()),
            fallible: true,
        });
    }
    Some(ReturnShape {
        value: (!is_unit(ty)).then(|| (**ty).clone()),
        fallible: false,
    })
}

/// `T` in `Result<T, E>`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(t) if t.elems.is_empty())
}

fn member_name(args: &MemberArgs, ident: &Ident) -> String {
    args.name
        .as_ref()
        .map_or_else(|| pascal_case(&unraw(ident)), LitStr::value)
}

fn unraw(ident: &Ident) -> String {
    let s = ident.to_string();
    s.strip_prefix("r#").map_or_else(|| s.clone(), str::to_string)
}

fn default_pattern_name(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_suffix("Provider") {
        Some(stem) if !stem.is_empty() => format!("{stem}Pattern"),
        _ => name,
    }
}

/// `snake_case` to `PascalCase`.
fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

fn parse_guid_lit(lit: &LitStr) -> syn::Result<u128> {
    parse_guid(&lit.value()).ok_or_else(|| {
        syn::Error::new(
            lit.span(),
            "malformed GUID, expected xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx",
        )
    })
}

/// Parse the registry form of a GUID, with or without braces.
fn parse_guid(text: &str) -> Option<u128> {
    let text = text.trim();
    let text = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text);

    let groups: Vec<&str> = text.split('-').collect();
    let well_formed = groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()));
    if !well_formed {
        return None;
    }
    u128::from_str_radix(&groups.concat(), 16).ok()
}

fn guid_tokens(value: u128) -> TokenStream2 {
    let mut lit = Literal::u128_suffixed(value);
    lit.set_span(Span::call_site());
    quote!(::uia_pattern::Guid::from_u128(#lit))
}

fn optional_guid(value: Option<u128>) -> TokenStream2 {
    match value {
        Some(v) => {
            let guid = guid_tokens(v);
            quote!(::core::option::Option::Some(#guid))
        }
        None => quote!(::core::option::Option::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guid() {
        assert_eq!(
            parse_guid("E69F099B-7519-4CE7-9D61-77146DCB1B4A"),
            Some(0xE69F_099B_7519_4CE7_9D61_7714_6DCB_1B4A)
        );
        assert_eq!(
            parse_guid("{d6dd68d1-86fd-4332-8666-9abedea2d24c}"),
            Some(0xD6DD_68D1_86FD_4332_8666_9ABE_DEA2_D24C)
        );
    }

    #[test]
    fn test_parse_guid_rejects_malformed() {
        assert_eq!(parse_guid(""), None);
        assert_eq!(parse_guid("E69F099B75194CE79D6177146DCB1B4A"), None);
        assert_eq!(parse_guid("E69F099B-7519-4CE7-9D61-77146DCB1B4"), None);
        assert_eq!(parse_guid("G69F099B-7519-4CE7-9D61-77146DCB1B4A"), None);
        assert_eq!(parse_guid("{E69F099B-7519-4CE7-9D61-77146DCB1B4A"), None);
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("bool_property"), "BoolProperty");
        assert_eq!(pascal_case("int_method_with_double_param"), "IntMethodWithDoubleParam");
        assert_eq!(pascal_case("value"), "Value");
        assert_eq!(pascal_case("_leading__double"), "LeadingDouble");
    }

    #[test]
    fn test_default_pattern_name() {
        let ident = Ident::new("GaugeProvider", Span::call_site());
        assert_eq!(default_pattern_name(&ident), "GaugePattern");
        let ident = Ident::new("Provider", Span::call_site());
        assert_eq!(default_pattern_name(&ident), "Provider");
        let ident = Ident::new("Gauge", Span::call_site());
        assert_eq!(default_pattern_name(&ident), "Gauge");
    }

    #[test]
    fn test_return_shape() {
        let output: ReturnType = syn::parse_quote!(-> Result<bool, ProviderError>);
        let shape = return_shape(&output).expect("shape");
        assert!(shape.fallible);
        assert_eq!(shape.value, Some(syn::parse_quote!(bool)));

        let output: ReturnType = syn::parse_quote!(-> Result<(), ProviderError>);
        let shape = return_shape(&output).expect("shape");
        assert!(shape.fallible);
        assert!(shape.value.is_none());

        let output: ReturnType = syn::parse_quote!(-> i32);
        let shape = return_shape(&output).expect("shape");
        assert!(!shape.fallible);
        assert_eq!(shape.value, Some(syn::parse_quote!(i32)));

        let output: ReturnType = syn::parse_quote!();
        assert!(return_shape(&output).is_none());
    }
}

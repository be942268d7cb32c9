//! `#[log_execution_time]` marker attribute.
//!
//! The attribute rewrites a function so its body runs inside
//! `timing::Interceptor`. Methods with a `self` receiver use the interceptor
//! of their `timing::Instrumented` owner; free functions use
//! `timing::default_interceptor()`. Methods report as `path::Type::method`,
//! free functions as `module_path::fn_name`.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenTree};
use quote::quote;
use syn::{Ident, ItemFn, ReturnType, Type};

/// Time every call of the annotated function and report it.
///
/// Return types whose last path segment ends in `Result` are reported as
/// failed when they return `Err`.
#[proc_macro_attribute]
pub fn log_execution_time(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new_spanned(
            proc_macro2::TokenStream::from(attr),
            "#[log_execution_time] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let func = syn::parse_macro_input!(item as ItemFn);
    match expand_timed(func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_timed(func: ItemFn) -> Result<proc_macro2::TokenStream, syn::Error> {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = func;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[log_execution_time] only supports synchronous functions",
        ));
    }
    if let Some(constness) = &sig.constness {
        return Err(syn::Error::new_spanned(
            constness,
            "#[log_execution_time] cannot be applied to a const fn",
        ));
    }

    let name = &sig.ident;
    let interceptor = Ident::new("__timing_interceptor", Span::mixed_site());
    let operation_name = Ident::new("__timing_operation", Span::mixed_site());

    // `Self` keeps same-named methods of different types apart.
    let (interceptor_ref, operation_init, operation) = if sig.receiver().is_some() {
        (
            quote!({
                use ::timing::Instrumented as _;
                self.interceptor()
            }),
            quote! {
                let #operation_name = ::std::format!(
                    "{}::{}",
                    ::core::any::type_name::<Self>(),
                    ::core::stringify!(#name)
                );
            },
            quote!(&#operation_name),
        )
    } else {
        (
            quote!(::timing::default_interceptor()),
            quote! {
                let #operation_name: &'static str = ::core::concat!(
                    ::core::module_path!(),
                    "::",
                    ::core::stringify!(#name)
                );
            },
            quote!(#operation_name),
        )
    };

    let call = match &sig.output {
        ReturnType::Default => quote! {
            #interceptor.call(#operation, || #block)
        },
        ReturnType::Type(_, ty) => {
            let closure = if matches!(**ty, Type::ImplTrait(_)) || borrows(ty) {
                quote!(|| #block)
            } else {
                quote!(|| -> #ty #block)
            };
            if returns_result(ty) {
                quote!(#interceptor.call_fallible(#operation, #closure))
            } else {
                quote!(#interceptor.call(#operation, #closure))
            }
        }
    };

    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            let #interceptor = ::std::clone::Clone::clone(#interceptor_ref);
            #operation_init
            #call
        }
    })
}

/// Whether the type's last path segment ends in `Result`
/// (`Result<T, E>`, `io::Result<T>`, `ClinicResult<T>`, ...).
fn returns_result(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident.to_string().ends_with("Result")),
        Type::Paren(inner) => returns_result(&inner.elem),
        Type::Group(inner) => returns_result(&inner.elem),
        _ => false,
    }
}

/// Closure return annotations cannot carry elided lifetimes, so borrowed
/// return types are left to inference.
fn borrows(ty: &Type) -> bool {
    fn any_borrow(tokens: proc_macro2::TokenStream) -> bool {
        tokens.into_iter().any(|token| match token {
            TokenTree::Punct(punct) => matches!(punct.as_char(), '&' | '\''),
            TokenTree::Group(group) => any_borrow(group.stream()),
            _ => false,
        })
    }
    any_borrow(quote!(#ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(src: &str) -> Type {
        syn::parse_str(src).unwrap()
    }

    #[test]
    fn test_returns_result() {
        assert!(returns_result(&ty("Result<u32, String>")));
        assert!(returns_result(&ty("std::io::Result<()>")));
        assert!(returns_result(&ty("ClinicResult<View>")));
        assert!(!returns_result(&ty("Option<u32>")));
        assert!(!returns_result(&ty("Vec<Result<u32, ()>>")));
        assert!(!returns_result(&ty("&str")));
    }

    #[test]
    fn test_method_routes_through_owner() {
        let func: ItemFn = syn::parse_quote! {
            pub fn show(&self, id: u32) -> String { format!("{id}") }
        };
        let expanded = expand_timed(func).unwrap().to_string();

        assert!(expanded.contains("Instrumented as _"));
        assert!(expanded.contains("self . interceptor ()"));
        assert!(expanded.contains("type_name :: < Self >"));
        assert!(expanded.contains(". call ("));
        assert!(!expanded.contains("call_fallible"));
    }

    #[test]
    fn test_free_fn_routes_through_default() {
        let func: ItemFn = syn::parse_quote! {
            fn load() -> Result<u32, String> { Ok(1) }
        };
        let expanded = expand_timed(func).unwrap().to_string();

        assert!(expanded.contains("default_interceptor"));
        assert!(expanded.contains("module_path !"));
        assert!(!expanded.contains("type_name"));
        assert!(expanded.contains("call_fallible"));
    }

    #[test]
    fn test_borrows() {
        assert!(borrows(&ty("&str")));
        assert!(borrows(&ty("Option<&Visit>")));
        assert!(borrows(&ty("(u32, &'static str)")));
        assert!(!borrows(&ty("Vec<String>")));
    }

    #[test]
    fn test_rejects_async() {
        let func: ItemFn = syn::parse_quote! {
            async fn fetch() -> u32 { 1 }
        };
        assert!(expand_timed(func).is_err());
    }

    #[test]
    fn test_rejects_const() {
        let func: ItemFn = syn::parse_quote! {
            const fn answer() -> u32 { 42 }
        };
        assert!(expand_timed(func).is_err());
    }
}

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{
    spanned::Spanned, FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments,
    ReturnType, Type,
};

const MARKER: &str = "command_handler";

/// What a handler method declares as its result.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HandlerReturn {
    /// No result, or `()`.
    Void,
    /// A plain value.
    Value,
    /// `Result<(), E>`, or a `Result` alias without type arguments.
    FallibleVoid,
    /// `Result<R, E>`, or an alias such as `io::Result<R>`.
    FallibleValue,
}

impl HandlerReturn {
    fn has_return_value(&self) -> bool {
        matches!(self, HandlerReturn::Value | HandlerReturn::FallibleValue)
    }
}

/// The parts of a marked method the registration table needs.
#[derive(Debug, Clone)]
pub(crate) struct HandlerSignature {
    pub ident: syn::Ident,
    pub command_ty: Type,
    pub accepts_context: bool,
    pub returns: HandlerReturn,
    pub output_span: Span,
}

pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new(
            attr.span(),
            "#[command_handlers] takes no arguments",
        ));
    }

    let mut item: ItemImpl = syn::parse2(item)?;
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "#[command_handlers] must be placed on an inherent impl block",
        ));
    }

    let mut signatures = Vec::new();
    let mut errors: Option<syn::Error> = None;

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        match take_marker(method) {
            Ok(false) => continue,
            Ok(true) => match handler_signature(method) {
                Ok(signature) => signatures.push(signature),
                Err(err) => combine(&mut errors, err),
            },
            Err(err) => combine(&mut errors, err),
        }
    }

    if let Some(err) = errors {
        return Err(err);
    }

    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let bindings = signatures.iter().map(binding_tokens);

    Ok(quote! {
        #item

        impl #impl_generics ::command_adapter::CommandHandlers for #self_ty #where_clause {
            fn register_handlers(
                handlers: ::command_adapter::HandlerRegistryBuilder<Self>,
            ) -> ::command_adapter::HandlerRegistryBuilder<Self> {
                handlers
                #(#bindings)*
            }
        }
    })
}

/// Remove the `#[command_handler]` marker from a method, reporting whether
/// it was there.
fn take_marker(method: &mut ImplItemFn) -> syn::Result<bool> {
    let mut found = false;
    let mut result = Ok(());

    method.attrs.retain(|attr| {
        let is_marker = attr
            .path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == MARKER);
        if !is_marker {
            return true;
        }
        if found {
            result = Err(syn::Error::new(attr.span(), "duplicate #[command_handler] marker"));
        } else if !matches!(attr.meta, syn::Meta::Path(_)) {
            result = Err(syn::Error::new(attr.span(), "#[command_handler] takes no arguments"));
        }
        found = true;
        false
    });

    result.map(|()| found)
}

/// Validate a marked method and extract its handler signature.
pub(crate) fn handler_signature(method: &ImplItemFn) -> syn::Result<HandlerSignature> {
    let sig = &method.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "command handlers must be synchronous",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "command handlers cannot be generic; the command type is the dispatch key",
        ));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some()
                && receiver.mutability.is_none()
                && receiver.colon_token.is_none() => {}
        Some(FnArg::Receiver(receiver)) => {
            return Err(syn::Error::new(
                receiver.span(),
                "command handlers must take `&self`",
            ));
        }
        _ => {
            return Err(syn::Error::new(
                sig.ident.span(),
                "command handlers must be methods taking `&self`",
            ));
        }
    }

    let params: Vec<&Type> = inputs
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => &*pat_type.ty,
            FnArg::Receiver(receiver) => &*receiver.ty,
        })
        .collect();

    let (command_ty, context_ty) = match params.as_slice() {
        [] => {
            return Err(syn::Error::new(
                sig.paren_token.span.join(),
                "command handlers must accept a command parameter",
            ));
        }
        [command] => (*command, None),
        [command, context] => (*command, Some(*context)),
        [_, _, extra, ..] => {
            return Err(syn::Error::new(
                extra.span(),
                "command handlers accept a command and an optional `&CommandContext`, nothing more",
            ));
        }
    };

    check_command_type(command_ty)?;
    if let Some(context_ty) = context_ty {
        check_context_type(context_ty)?;
    }

    Ok(HandlerSignature {
        ident: sig.ident.clone(),
        command_ty: command_ty.clone(),
        accepts_context: context_ty.is_some(),
        returns: handler_return(&sig.output),
        output_span: sig.output.span(),
    })
}

fn check_command_type(ty: &Type) -> syn::Result<()> {
    let problem = match ty {
        Type::Reference(_) => Some("the command parameter must be an owned value, not a reference"),
        Type::ImplTrait(_) | Type::TraitObject(_) => {
            Some("the command parameter must be a concrete type")
        }
        Type::Infer(_) | Type::Never(_) => Some("the command parameter must be a concrete type"),
        _ => None,
    };

    match problem {
        Some(message) => Err(syn::Error::new(ty.span(), message)),
        None => Ok(()),
    }
}

fn check_context_type(ty: &Type) -> syn::Result<()> {
    let is_context = match ty {
        Type::Reference(reference) if reference.mutability.is_none() => match &*reference.elem {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "CommandContext"),
            _ => false,
        },
        _ => false,
    };

    if is_context {
        Ok(())
    } else {
        Err(syn::Error::new(
            ty.span(),
            "the second parameter of a command handler must be `&CommandContext`",
        ))
    }
}

/// Classify a return type by its spelling.
///
/// Any path whose last segment is named `Result` or ends in `Result` is a
/// `Result` alias. Its first type argument is taken as the success type; an
/// alias without arguments (`fmt::Result`) is taken as `Result<(), E>`. The
/// generated code checks both guesses against the real type.
fn handler_return(output: &ReturnType) -> HandlerReturn {
    let ty = match output {
        ReturnType::Default => return HandlerReturn::Void,
        ReturnType::Type(_, ty) => &**ty,
    };

    let last = match ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => return HandlerReturn::Void,
        Type::Path(path) => match path.path.segments.last() {
            Some(last) => last,
            None => return HandlerReturn::Value,
        },
        _ => return HandlerReturn::Value,
    };
    if !last.ident.to_string().ends_with("Result") {
        return HandlerReturn::Value;
    }

    let ok_ty = match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    };
    match ok_ty {
        Some(Type::Tuple(tuple)) if tuple.elems.is_empty() => HandlerReturn::FallibleVoid,
        Some(_) => HandlerReturn::FallibleValue,
        None => HandlerReturn::FallibleVoid,
    }
}

fn binding_tokens(signature: &HandlerSignature) -> TokenStream {
    let ident = &signature.ident;
    let name = ident.to_string();
    let command_ty = &signature.command_ty;
    let accepts_context = signature.accepts_context;
    let has_return_value = signature.returns.has_return_value();

    let call = if accepts_context {
        quote! { Self::#ident(target, command, context) }
    } else {
        quote! { Self::#ident(target, command) }
    };

    let body = match signature.returns {
        HandlerReturn::Void => quote! {
            #call;
            ::core::result::Result::Ok(::command_adapter::Outcome::Void)
        },
        HandlerReturn::Value => quote! {
            ::core::result::Result::Ok(::command_adapter::Outcome::value(#call))
        },
        // Spanned at the return type so a non-`Result` type named `...Result`
        // is reported there.
        HandlerReturn::FallibleVoid => quote_spanned! {signature.output_span=>
            ::command_adapter::IntoHandlerResult::into_handler_result(#call)
                .map(|()| ::command_adapter::Outcome::Void)
        },
        HandlerReturn::FallibleValue => quote_spanned! {signature.output_span=>
            ::command_adapter::IntoHandlerResult::into_handler_result(#call)
                .map(::command_adapter::Outcome::value)
        },
    };

    let context_param = if accepts_context {
        quote! { context }
    } else {
        quote! { _context }
    };

    quote! {
        .bind::<#command_ty, _>(
            #name,
            ::command_adapter::HandlerShape::new(#accepts_context, #has_return_value),
            |target: &Self,
             command: #command_ty,
             #context_param: &::command_adapter::CommandContext|
             -> ::core::result::Result<::command_adapter::Outcome, ::command_adapter::HandlerFailure> {
                #body
            },
        )
    }
}

fn combine(errors: &mut Option<syn::Error>, err: syn::Error) {
    match errors {
        Some(existing) => existing.combine(err),
        None => *errors = Some(err),
    }
}

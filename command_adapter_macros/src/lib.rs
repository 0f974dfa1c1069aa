mod handlers;

use proc_macro::TokenStream;

// ============================================================================
// #[command_handlers] attribute macro
// ============================================================================

/// Attribute macro that turns the `#[command_handler]` methods of an
/// inherent impl block into a `CommandHandlers` implementation.
///
/// Each marked method is registered under the type of its first parameter.
/// The method name does not matter for dispatch.
///
/// # Usage
///
/// ```ignore
/// #[command_handlers]
/// impl Inventory {
///     // void handler: dispatch yields Outcome::Void
///     #[command_handler]
///     fn restock(&self, command: Restock) {
///         self.add(command.sku, command.quantity);
///     }
///
///     // value handler with the invocation context
///     #[command_handler]
///     fn reserve(&self, command: Reserve, ctx: &CommandContext) -> Result<ReservationId, InventoryError> {
///         self.try_reserve(command, ctx.correlation_id())
///     }
///
///     // not marked, never dispatched to
///     fn add(&self, sku: String, quantity: u32) { /* ... */ }
/// }
/// ```
///
/// Accepted handler shapes:
/// - receiver `&self`
/// - one owned command parameter, optionally followed by `&CommandContext`
/// - no result, `()`, any value `R`, `Result<(), E>` or `Result<R, E>`
///   where `E: Into<Box<dyn Error + Send + Sync>>`
///
/// A return type whose name ends in `Result` is read as a `Result` alias:
/// `io::Result<R>` and `MyResult<R>` are fallible values, `fmt::Result` is a
/// fallible void. A value type named that way is a compile error; return it
/// through an alias with another name.
///
/// Anything else is rejected with a compile error pointing at the method.
#[proc_macro_attribute]
pub fn command_handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    handlers::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// ============================================================================
// #[command_handler] marker
// ============================================================================

/// Marks a method as a command handler.
///
/// Only meaningful inside an impl block annotated with `#[command_handlers]`,
/// which consumes the marker. Anywhere else it is a compile error.
#[proc_macro_attribute]
pub fn command_handler(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = proc_macro2::TokenStream::from(item);
    let error = syn::Error::new(
        proc_macro2::Span::call_site(),
        "#[command_handler] must be used on a method inside a #[command_handlers] impl block",
    )
    .into_compile_error();
    quote::quote!(#error #item).into()
}

#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Impulse crates.
//!
//! * [`macro@impulse_error`] turns an enum into a `thiserror` error with context support.
//! * [`macro@shared_handle`] turns a state struct into an `Arc`-backed cloneable handle.
//!
//! Examples are `ignore`d here because the expansion refers to crates this proc-macro
//! crate does not depend on; see the tests of the consuming crates for compiled usage.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Defines a domain error enum wired into the workspace conventions.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug` and `thiserror::Error` unless already present.
/// * **Context**: a companion `<Name>Ext` trait adding `.context(...)` to
///   `Result<T, Name>` and to `Result<T, Source>` for every variant that wraps a source.
/// * **Conversions**: `From<Source>` for each source variant so `?` works on upstream errors.
/// * **Internal fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
/// * **Formatting helper**: a private `format_context` fn usable in `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Only enums with named-field variants are accepted.
/// 2. A variant carrying a `source` (by name, `#[source]` or `#[from]`) must also carry
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[impulse_derive::impulse_error]
/// pub enum ThemeError {
///     #[error("Malformed document{}: {source}", format_context(.context))]
///     Parse { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal theme error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn parse(raw: &str) -> Result<serde_json::Value, ThemeError> {
///     serde_json::from_str(raw).context("Parsing theme row")
/// }
/// ```
#[proc_macro_attribute]
pub fn impulse_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Turns a struct into a shared, cheaply cloneable handle.
///
/// The annotated struct is renamed to `<Name>State` and a `<Name>` wrapper holding an
/// `Arc<<Name>State>` is generated, with `Deref` to the state, `from_state` and `same_as`.
/// Generic structs are rejected.
///
/// # Example
///
/// ```rust,ignore
/// #[impulse_derive::shared_handle]
/// pub struct Registry {
///     entries: parking_lot::RwLock<Vec<String>>,
/// }
///
/// let registry = Registry::from_state(RegistryState { entries: Default::default() });
/// let alias = registry.clone();
/// assert!(registry.same_as(&alias));
/// ```
#[proc_macro_attribute]
pub fn shared_handle(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::handle::expand(input).into()
}

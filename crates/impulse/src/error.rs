use std::borrow::Cow;

/// Errors raised while bootstrapping a [`crate::Platform`].
#[impulse_derive::impulse_error]
pub enum PlatformError {
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: impulse_kernel::config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Logger error{}: {source}", format_context(.context))]
    Logger { source: impulse_logger::LoggerError, context: Option<Cow<'static, str>> },

    #[error("Layout error{}: {source}", format_context(.context))]
    Layout { source: impulse_layout::LayoutError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal platform error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

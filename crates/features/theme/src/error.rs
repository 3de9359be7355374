use std::borrow::Cow;

/// A specialized [`ThemeError`] enum of this crate.
#[impulse_derive::impulse_error]
pub enum ThemeError {
    /// The source has no theme with the requested id (or no default theme).
    #[error("Theme not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The row lacks a field that cannot be substituted (`id`), or is not an object.
    #[error("Malformed theme document{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backing source failed (network, database, permissions).
    #[error("Theme source failure{}: {message}", format_context(.context))]
    Source { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Theme I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Theme JSON failure{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal theme error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

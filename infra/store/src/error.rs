use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[tilt_derive::tilt_error]
pub enum StoreError {
    #[error("Config file not found{}: {message}", format_context(.context))]
    FileNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Config I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Config was not loaded, refusing to overwrite it{}: {message}", format_context(.context))]
    NotLoaded { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

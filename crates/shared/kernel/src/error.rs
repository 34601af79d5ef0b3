use std::borrow::Cow;

#[tilt_derive::tilt_error]
pub enum KernelError {
    #[error("Settings error{}: {source}", format_context(.context))]
    Settings { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Config store error{}: {source}", format_context(.context))]
    Store { source: tilt_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Context validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal kernel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

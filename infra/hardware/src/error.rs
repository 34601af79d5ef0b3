use std::borrow::Cow;

#[tilt_derive::tilt_error]
pub enum HardwareError {
    #[error("No async runtime{}: {source}", format_context(.context))]
    Runtime { source: tokio::runtime::TryCurrentError, context: Option<Cow<'static, str>> },

    #[error("Invalid servo position{}: {message}", format_context(.context))]
    Position { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal hardware error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

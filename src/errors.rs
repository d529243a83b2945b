use thiserror::Error;

/// A `#define __NR_*` whose value couldn't be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Neither an integer literal nor a `__NR` reference.
    #[error("could not process \"{text}\"")]
    NotAnExpression { text: String },

    /// `__NR_foo + X` where X isn't an integer literal.
    #[error("bad increment \"{increment}\" on {reference}")]
    BadIncrement { reference: String, increment: String },
}

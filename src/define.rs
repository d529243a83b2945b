use std::fmt;

use crate::{errors::ExpressionError, literal::parse_literal};

pub const PLAIN_PREFIX: &str = "__NR_";
pub const WIDE_PREFIX: &str = "__NR3264_";

/// Which of the two parallel macro namespaces a name lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// `__NR_foo`, architecture specific
    Plain,
    /// `__NR3264_foo`, the generic 32/64 fallback
    Wide,
}

impl Variant {
    pub fn prefix(self) -> &'static str {
        match self {
            Variant::Plain => PLAIN_PREFIX,
            Variant::Wide => WIDE_PREFIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyscallKey {
    pub variant: Variant,
    pub name: String,
}

impl SyscallKey {
    pub fn new(variant: Variant, name: impl Into<String>) -> Self {
        SyscallKey {
            variant,
            name: name.into(),
        }
    }

    #[cfg(test)]
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(Variant::Plain, name)
    }

    #[cfg(test)]
    pub fn wide(name: impl Into<String>) -> Self {
        Self::new(Variant::Wide, name)
    }
}

impl fmt::Display for SyscallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.variant.prefix(), self.name)
    }
}

/// One `#define __NR[3264]_name value` line, value still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineLine<'a> {
    pub key: SyscallKey,
    pub value: &'a str,
}

/// What a define's value turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(i64),
    Reference { target: SyscallKey, increment: i64 },
}

/// Matches a syscall define, `None` for every other kind of line.
pub fn classify(line: &str) -> Option<DefineLine<'_>> {
    let rest = line.trim().strip_prefix("#define")?;
    let rest = skip_whitespace(rest)?;
    let (key, rest) = split_macro(rest)?;
    let value = skip_whitespace(rest)?.trim_end();
    if value.is_empty() {
        return None;
    }
    Some(DefineLine { key, value })
}

/// Parses a define value: a literal, `__NR_x`, or `__NR_x + N`, each
/// optionally wrapped in one pair of parentheses.
pub fn parse_expression(value: &str) -> Result<Expression, ExpressionError> {
    let inner = strip_parens(value);
    if let Some(number) = parse_literal(inner) {
        return Ok(Expression::Literal(number));
    }
    parse_reference(inner)
}

fn parse_reference(text: &str) -> Result<Expression, ExpressionError> {
    let not_an_expression = || ExpressionError::NotAnExpression {
        text: text.to_owned(),
    };
    let (target, rest) = split_macro(text).ok_or_else(not_an_expression)?;
    if rest.is_empty() {
        return Ok(Expression::Reference {
            target,
            increment: 0,
        });
    }

    let increment = skip_whitespace(rest)
        .and_then(|rest| rest.strip_prefix('+'))
        .and_then(skip_whitespace)
        .filter(|increment| !increment.contains(char::is_whitespace))
        .ok_or_else(not_an_expression)?;
    // the increment is unsigned, `+ -1` is not a way to subtract
    let unsigned = !increment.starts_with(['+', '-']);
    match parse_literal(increment).filter(|_| unsigned) {
        Some(increment) => Ok(Expression::Reference { target, increment }),
        None => Err(ExpressionError::BadIncrement {
            reference: target.to_string(),
            increment: increment.to_owned(),
        }),
    }
}

fn strip_parens(value: &str) -> &str {
    value
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(value)
}

/// Splits `__NR[3264]_name<rest>` into its key and whatever follows the name.
fn split_macro(text: &str) -> Option<(SyscallKey, &str)> {
    let (variant, rest) = if let Some(rest) = text.strip_prefix(WIDE_PREFIX) {
        (Variant::Wide, rest)
    } else {
        (Variant::Plain, text.strip_prefix(PLAIN_PREFIX)?)
    };
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some((SyscallKey::new(variant, &rest[..end]), &rest[end..]))
}

/// Drops leading whitespace, `None` if there was none.
fn skip_whitespace(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    (trimmed.len() < text.len()).then_some(trimmed)
}

/// Parses a C integer literal.
///
/// `0x`/`0X` selects hex, any other leading `0` selects octal, everything
/// else is decimal. `None` means the text isn't a literal at all, the caller
/// should try it as a reference instead.
pub fn parse_literal(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        return parse_radix(hex, 16);
    }
    if text.len() > 1 && text.starts_with('0') {
        return parse_radix(&text[1..], 8);
    }
    parse_radix(text, 10)
}

fn parse_radix(digits: &str, radix: u32) -> Option<i64> {
    // from_str_radix takes a sign after a base prefix, C doesn't
    if digits.is_empty() || (radix != 10 && digits.starts_with(['+', '-'])) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

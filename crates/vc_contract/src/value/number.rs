use alloc::format;
use alloc::string::String;

// -----------------------------------------------------------------------------
// Text -> Number

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return f64::NAN;
    }
    u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64)
}

/// Parses numeric text.
///
/// Whitespace is trimmed and empty text is `0`. Besides decimal literals,
/// `0x`, `0o` and `0b` prefixes and `Infinity` are accepted. Anything else is NaN.
pub(crate) fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let bytes = text.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return parse_radix(&text[2..], 16),
            b'o' | b'O' => return parse_radix(&text[2..], 8),
            b'b' | b'B' => return parse_radix(&text[2..], 2),
            _ => {}
        }
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // `f64::from_str` also reads `inf` and `nan`.
    if bytes
        .iter()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return f64::NAN;
    }

    text.parse::<f64>().unwrap_or(f64::NAN)
}

// -----------------------------------------------------------------------------
// Number -> Text

/// Shortest text of a number, integral values carry no fraction.
pub(crate) fn number_text(n: f64) -> String {
    if n.is_nan() {
        return String::from("NaN");
    }
    if n.is_infinite() {
        return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return String::from("0");
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

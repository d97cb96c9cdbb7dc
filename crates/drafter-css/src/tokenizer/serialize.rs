//! [CSSOM § 2.1 Common Serializing Idioms](https://www.w3.org/TR/cssom-1/#common-serializing-idioms)
//!
//! Turns tokens back into CSS text. Re-tokenizing the output of
//! [`serialize_tokens`] yields the same tokens again: adjacent tokens that
//! would merge are separated by an empty comment, and every payload is escaped
//! so that it reads back unchanged.

use core::fmt::Write;

use super::token::{CSSToken, HashType, NumericType};
use super::tokenizer::{is_ident_code_point, is_ident_start_code_point, is_non_printable};

impl CSSToken {
    /// Serialize a single token to CSS text.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        write_token(&mut out, self);
        out
    }
}

/// Serialize a token sequence so that it tokenizes back to the same sequence.
///
/// A trailing [`CSSToken::EOF`] contributes nothing.
pub fn serialize_tokens<'a>(tokens: impl IntoIterator<Item = &'a CSSToken>) -> String {
    let mut out = String::new();
    let mut previous: Option<&CSSToken> = None;

    for token in tokens {
        if token.is_eof() {
            break;
        }
        match (previous, token) {
            (Some(CSSToken::BadString | CSSToken::Delim('\\')), CSSToken::Whitespace) => {
                // Only a newline keeps these from swallowing what follows.
                out.push('\n');
            }
            (_, CSSToken::Whitespace) => out.push(' '),
            (Some(prev), _) => {
                if needs_separator(prev, token) {
                    out.push_str("/**/");
                }
                write_token(&mut out, token);
            }
            (None, _) => write_token(&mut out, token),
        }
        previous = Some(token);
    }

    out
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// "insert an empty comment (/**/) between any two tokens that would otherwise
/// be tokenized as a different sequence", extended for the match operators and
/// `<unicode-range-token>`.
fn needs_separator(previous: &CSSToken, next: &CSSToken) -> bool {
    use CSSToken as T;

    let next_is_ident_like = matches!(
        next,
        T::Ident(_) | T::Function(_) | T::Url(_) | T::BadUrl | T::UnicodeRange { .. }
    );
    let next_is_numeric = matches!(
        next,
        T::Number { .. } | T::Percentage { .. } | T::Dimension { .. }
    );

    match previous {
        T::UnicodeRange { .. } => !next.is_whitespace(),
        T::Ident(value) => {
            next_is_ident_like
                || next_is_numeric
                || matches!(next, T::Delim('-') | T::CDC | T::LeftParen)
                || (matches!(next, T::Delim('+')) && value.eq_ignore_ascii_case("u"))
        }
        T::AtKeyword(_) | T::Hash { .. } | T::Dimension { .. } | T::Delim('#' | '-') => {
            next_is_ident_like || next_is_numeric || matches!(next, T::Delim('-') | T::CDC)
        }
        T::Number { .. } => {
            next_is_ident_like || next_is_numeric || matches!(next, T::Delim('%') | T::CDC)
        }
        T::Delim('@') => next_is_ident_like || matches!(next, T::Delim('-') | T::CDC),
        T::Delim('.' | '+') => next_is_numeric,
        T::Delim('/') => matches!(next, T::Delim('*') | T::SubstringMatch),
        T::Delim('<') => matches!(next, T::Delim('!')),
        T::Delim('|') => matches!(next, T::Delim('=' | '|') | T::Column | T::DashMatch),
        T::Delim('$' | '*' | '^' | '~') => matches!(next, T::Delim('=')),
        _ => false,
    }
}

fn write_token(out: &mut String, token: &CSSToken) {
    match token {
        CSSToken::Ident(value) => write_identifier(out, value),
        CSSToken::Function(name) => {
            write_identifier(out, name);
            out.push('(');
        }
        CSSToken::AtKeyword(value) => {
            out.push('@');
            write_identifier(out, value);
        }
        CSSToken::Hash { value, hash_type } => {
            out.push('#');
            match hash_type {
                HashType::Id => write_identifier(out, value),
                HashType::Unrestricted => write_name(out, value),
            }
        }
        CSSToken::String(value) => write_string(out, value),
        CSSToken::BadString => out.push('"'),
        CSSToken::Url(value) => {
            out.push_str("url(");
            for c in value.chars() {
                match c {
                    c if c.is_whitespace() || is_non_printable(c) => write_hex_escape(out, c),
                    '"' | '\'' | '(' | ')' | '\\' => {
                        out.push('\\');
                        out.push(c);
                    }
                    c => out.push(c),
                }
            }
            out.push(')');
        }
        CSSToken::BadUrl => out.push_str("url(()"),
        CSSToken::Delim(c) => out.push(*c),
        CSSToken::Number {
            value,
            int_value,
            numeric_type,
        } => write_number(out, *value, *int_value, *numeric_type),
        CSSToken::Percentage {
            value,
            int_value,
            numeric_type,
        } => {
            write_number(out, *value, *int_value, *numeric_type);
            out.push('%');
        }
        CSSToken::Dimension {
            value,
            int_value,
            numeric_type,
            unit,
        } => {
            write_number(out, *value, *int_value, *numeric_type);
            let mut chars = unit.chars();
            // A unit starting with "e" would read back as an exponent.
            match chars.next() {
                Some(first @ ('e' | 'E')) => {
                    write_hex_escape(out, first);
                    write_name(out, chars.as_str());
                }
                _ => write_identifier(out, unit),
            }
        }
        CSSToken::UnicodeRange { start, end } => {
            if start == end {
                let _ = write!(out, "U+{start:X}");
            } else {
                let _ = write!(out, "U+{start:X}-{end:X}");
            }
        }
        CSSToken::IncludeMatch => out.push_str("~="),
        CSSToken::DashMatch => out.push_str("|="),
        CSSToken::PrefixMatch => out.push_str("^="),
        CSSToken::SuffixMatch => out.push_str("$="),
        CSSToken::SubstringMatch => out.push_str("*="),
        CSSToken::Column => out.push_str("||"),
        CSSToken::Whitespace => out.push(' '),
        CSSToken::CDO => out.push_str("<!--"),
        CSSToken::CDC => out.push_str("-->"),
        CSSToken::Colon => out.push(':'),
        CSSToken::Semicolon => out.push(';'),
        CSSToken::Comma => out.push(','),
        CSSToken::LeftBracket => out.push('['),
        CSSToken::RightBracket => out.push(']'),
        CSSToken::LeftParen => out.push('('),
        CSSToken::RightParen => out.push(')'),
        CSSToken::LeftBrace => out.push('{'),
        CSSToken::RightBrace => out.push('}'),
        CSSToken::EOF => {}
    }
}

fn write_number(out: &mut String, value: f64, int_value: Option<i64>, numeric_type: NumericType) {
    match (numeric_type, int_value) {
        (NumericType::Integer, Some(i)) => {
            let _ = write!(out, "{i}");
        }
        _ if value.is_infinite() => {
            out.push_str(if value < 0.0 { "-1e999" } else { "1e999" });
        }
        (NumericType::Integer, None) => {
            let _ = write!(out, "{value}");
        }
        (NumericType::Number, _) => {
            let _ = write!(out, "{value}");
            if value.fract() == 0.0 {
                out.push_str(".0");
            }
        }
    }
}

/// [CSSOM § 2.1 serialize an identifier](https://www.w3.org/TR/cssom-1/#serialize-an-identifier)
pub(crate) fn write_identifier(out: &mut String, value: &str) {
    let chars: Vec<char> = value.chars().collect();
    for (index, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit()
            && (index == 0 || (index == 1 && chars.first() == Some(&'-')));
        if leading_digit {
            write_hex_escape(out, c);
        } else if index == 0 && c == '-' && chars.len() == 1 {
            // "If the character is the first character and is a "-" (U+002D), and
            // there is no second character, then the escaped character."
            out.push_str("\\-");
        } else if is_ident_code_point(c) {
            out.push(c);
        } else {
            write_escaped(out, c);
        }
    }
}

/// Like [`write_identifier`] but without the leading-character rules, as used for
/// unrestricted hashes and the tail of a dimension unit.
fn write_name(out: &mut String, value: &str) {
    for c in value.chars() {
        if is_ident_code_point(c) {
            out.push(c);
        } else {
            write_escaped(out, c);
        }
    }
}

/// [CSSOM § 2.1 serialize a string](https://www.w3.org/TR/cssom-1/#serialize-a-string)
pub(crate) fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c == '\n' || c.is_control() => write_hex_escape(out, c),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_escaped(out: &mut String, c: char) {
    if c.is_control() || c.is_ascii_hexdigit() || c == '\n' {
        write_hex_escape(out, c);
    } else {
        out.push('\\');
        out.push(c);
    }
}

/// [CSSOM § 2.1 escape a character as code point](https://www.w3.org/TR/cssom-1/#escape-a-character-as-code-point)
///
/// "the character escaped as code point is the string "\" (U+005C), followed
/// by the Unicode code point as the smallest possible number of hexadecimal
/// digits in the range 0-9 a-f (U+0030 to U+0039 and U+0061 to U+0066) to
/// represent the code point in base 16, followed by a single SPACE (U+0020)."
fn write_hex_escape(out: &mut String, c: char) {
    let _ = write!(out, "\\{:x} ", u32::from(c));
}

/// Whether `value` would tokenize as a single ident token without escaping.
#[must_use]
pub fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let starts = match chars.next() {
        Some('-') => match chars.next() {
            Some(c) => is_ident_start_code_point(c) || c == '-',
            None => false,
        },
        Some(c) => is_ident_start_code_point(c),
        None => false,
    };
    starts && value.chars().all(is_ident_code_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(value: &str) -> String {
        let mut out = String::new();
        write_identifier(&mut out, value);
        out
    }

    #[test]
    fn test_identifier_escapes_leading_digit() {
        assert_eq!(ident("1a"), "\\31 a");
        assert_eq!(ident("-1"), "-\\31 ");
        assert_eq!(ident("-"), "\\-");
        assert_eq!(ident("a b"), "a\\ b");
    }

    #[test]
    fn test_plain_identifier() {
        assert!(is_plain_identifier("fill"));
        assert!(is_plain_identifier("--custom"));
        assert!(!is_plain_identifier("-"));
        assert!(!is_plain_identifier("2d"));
        assert!(!is_plain_identifier("two words"));
    }
}

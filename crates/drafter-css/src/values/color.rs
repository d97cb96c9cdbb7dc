//! CSS Color values and parsing
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

use crate::error::ConversionError;
use crate::tokenizer::{CSSToken, TokenStream, is_plain_identifier};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The basic 16 HTML colors plus the common aliases.
const NAMED_COLORS: &[(&str, ColorValue)] = &[
    ("black", ColorValue::rgb(0, 0, 0)),
    ("silver", ColorValue::rgb(192, 192, 192)),
    ("gray", ColorValue::rgb(128, 128, 128)),
    ("grey", ColorValue::rgb(128, 128, 128)),
    ("white", ColorValue::rgb(255, 255, 255)),
    ("maroon", ColorValue::rgb(128, 0, 0)),
    ("red", ColorValue::rgb(255, 0, 0)),
    ("purple", ColorValue::rgb(128, 0, 128)),
    ("fuchsia", ColorValue::rgb(255, 0, 255)),
    ("magenta", ColorValue::rgb(255, 0, 255)),
    ("green", ColorValue::rgb(0, 128, 0)),
    ("lime", ColorValue::rgb(0, 255, 0)),
    ("olive", ColorValue::rgb(128, 128, 0)),
    ("yellow", ColorValue::rgb(255, 255, 0)),
    ("navy", ColorValue::rgb(0, 0, 128)),
    ("blue", ColorValue::rgb(0, 0, 255)),
    ("teal", ColorValue::rgb(0, 128, 128)),
    ("aqua", ColorValue::rgb(0, 255, 255)),
    ("cyan", ColorValue::rgb(0, 255, 255)),
    ("orange", ColorValue::rgb(255, 165, 0)),
    ("transparent", ColorValue::TRANSPARENT),
];

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(digit(0)?, digit(1)?, digit(2)?)),
            // Four-digit RGBA notation (#RGBA)
            4 => Some(Self {
                r: digit(0)?,
                g: digit(1)?,
                b: digit(2)?,
                a: digit(3)?,
            }),
            // Six-digit RGB notation (#RRGGBB)
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            // Eight-digit RGBA notation (#RRGGBBAA)
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    /// "CSS defines a large set of named colors..."
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    ///
    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// The hash token this color serializes to.
    #[must_use]
    pub fn to_token(&self) -> CSSToken {
        let hex = self.to_hex_string();
        let digits = &hex[1..];
        if is_plain_identifier(digits) {
            CSSToken::hash_id(digits)
        } else {
            CSSToken::hash_unrestricted(digits)
        }
    }

    /// Parse a color from the next significant token of `stream`: a hash,
    /// a named color, or an `rgb()`/`rgba()` function.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the token is not a color.
    pub fn parse(stream: &mut TokenStream<'_>) -> Result<Self, ConversionError> {
        let token = stream.next_non_whitespace();
        let position = stream.position();
        let color = match token {
            CSSToken::Hash { value, .. } => Self::from_hex(value),
            CSSToken::Ident(name) => Self::from_named(name),
            CSSToken::Function(name)
                if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
            {
                return parse_rgb_function(name, stream);
            }
            _ => None,
        };
        color.ok_or_else(|| ConversionError::UnexpectedToken {
            expected: "color".to_owned(),
            found: token.to_css(),
            position,
        })
    }
}

/// A numeric value extracted from a color function argument.
///
/// Color function arguments can be either plain numbers (0-255 for RGB)
/// or percentages (0%-100%).
#[derive(Debug, Clone, Copy)]
enum ColorArg {
    Number(f64),
    Percentage(f64),
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "rgb() = rgb( <percentage>{3} [ / <alpha-value> ]? ) |
///          rgb( <number>{3} [ / <alpha-value> ]? )"
///
/// Legacy: "rgb( <percentage>#{3} , <alpha-value>? ) |
///          rgb( <number>#{3} , <alpha-value>? )"
///
/// Expects the stream to be just past the function token.
fn parse_rgb_function(name: &str, stream: &mut TokenStream<'_>) -> Result<ColorValue, ConversionError> {
    let start = stream.position();
    let mut args = Vec::new();

    loop {
        match stream.next_non_whitespace() {
            CSSToken::Number { value, .. } => args.push(ColorArg::Number(*value)),
            CSSToken::Percentage { value, .. } => args.push(ColorArg::Percentage(*value)),
            // "/ <alpha-value>" and legacy commas both just separate arguments.
            CSSToken::Comma | CSSToken::Delim('/') => {}
            CSSToken::RightParen => break,
            other => {
                return Err(ConversionError::UnexpectedToken {
                    expected: format!("{name}() argument"),
                    found: other.to_css(),
                    position: stream.position(),
                });
            }
        }
    }

    let [r, g, b, rest @ ..] = args.as_slice() else {
        return Err(ConversionError::ArgumentCount {
            function: name.to_owned(),
            count: args.len(),
            position: start,
        });
    };

    // [§ 4.1](https://www.w3.org/TR/css-color-4/#rgb-functions)
    //
    // "The final argument, <alpha-value>, specifies the alpha of the color."
    // "If omitted, it defaults to 100%."
    let a = match rest {
        [] => 255,
        [alpha] => alpha_to_u8(*alpha),
        _ => {
            return Err(ConversionError::ArgumentCount {
                function: name.to_owned(),
                count: args.len(),
                position: start,
            });
        }
    };

    Ok(ColorValue {
        r: color_channel_to_u8(*r),
        g: color_channel_to_u8(*g),
        b: color_channel_to_u8(*b),
        a,
    })
}

/// Convert a color channel argument to a u8 (0-255).
///
/// "Values outside these ranges are not invalid, but are clamped."
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn color_channel_to_u8(arg: ColorArg) -> u8 {
    let v = match arg {
        ColorArg::Number(n) => n,
        // "100% = 255"
        ColorArg::Percentage(p) => p * 255.0 / 100.0,
    };
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert an alpha argument to a u8 (0-255).
///
/// "The <alpha-value> can be a <number> (clamped to [0, 1]) or a
/// <percentage> (clamped to [0%, 100%])."
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_to_u8(arg: ColorArg) -> u8 {
    let v = match arg {
        ColorArg::Number(n) => n * 255.0,
        ColorArg::Percentage(p) => p * 255.0 / 100.0,
    };
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenList;

    fn parse(text: &str) -> Result<ColorValue, ConversionError> {
        let list = TokenList::parse(text);
        ColorValue::parse(&mut list.stream())
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(ColorValue::from_hex("#f00"), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(ColorValue::from_hex("ff000080").map(|c| c.a), Some(128));
        assert_eq!(ColorValue::from_hex("#ggg"), None);
        assert_eq!(ColorValue::from_hex("#12345"), None);
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(parse("rgb(255, 0, 0)").ok(), Some(ColorValue::rgb(255, 0, 0)));
        assert_eq!(parse("rgba(0 0 0 / 50%)").map(|c| c.a).ok(), Some(128));
        assert!(matches!(
            parse("rgb(1, 2)"),
            Err(ConversionError::ArgumentCount { count: 2, .. })
        ));
    }

    #[test]
    fn test_token_kind_follows_digits() {
        assert_eq!(ColorValue::rgb(255, 0, 0).to_token(), CSSToken::hash_id("ff0000"));
        assert_eq!(
            ColorValue::rgb(0, 255, 0).to_token(),
            CSSToken::hash_unrestricted("00ff00")
        );
    }
}

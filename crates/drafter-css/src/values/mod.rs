//! Typed property values.
//!
//! Converters turn declaration tokens into a [`StyleValue`] and write it back
//! to tokens. The written form is canonical: the value interner keys on it,
//! and attribute selectors compare against it.

use core::fmt;

use serde::Serialize;

/// CSS Color values per [CSS Color Level 4](https://www.w3.org/TR/css-color-4/).
pub mod color;
/// Transform functions per [CSS Transforms Level 1](https://www.w3.org/TR/css-transforms-1/).
pub mod transform;

pub use color::ColorValue;
pub use transform::Transform;

use crate::tokenizer::{CSSToken, is_plain_identifier, serialize_tokens};

/// [CSS Values § 6 Distance units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// A number with an optional unit; an empty unit means unitless.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeValue {
    /// The numeric part.
    pub value: f64,
    /// `px`, `%`, ... or empty.
    pub unit: String,
}

impl SizeValue {
    /// A unitless size.
    #[must_use]
    pub const fn unitless(value: f64) -> Self {
        Self {
            value,
            unit: String::new(),
        }
    }

    /// A size with a unit.
    #[must_use]
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// The token this size serializes to.
    #[must_use]
    pub fn to_token(&self) -> CSSToken {
        match self.unit.as_str() {
            "" => CSSToken::number(self.value),
            "%" => CSSToken::percentage(self.value),
            unit => CSSToken::dimension(self.value, unit),
        }
    }
}

/// A converted property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleValue {
    /// A color.
    Color(ColorValue),
    /// A plain number.
    Number(f64),
    /// A number with an optional unit.
    Size(SizeValue),
    /// One keyword from a fixed set, lowercased.
    Keyword(String),
    /// Free text.
    String(String),
    /// A list of words, such as style classes.
    WordList(Vec<String>),
    /// `true` or `false`.
    Boolean(bool),
    /// A transform list; empty is `none`.
    Transforms(Vec<Transform>),
}

impl StyleValue {
    /// The canonical token form of this value.
    #[must_use]
    pub fn to_tokens(&self) -> Vec<CSSToken> {
        match self {
            Self::Color(color) => vec![color.to_token()],
            Self::Number(value) => vec![CSSToken::number(*value)],
            Self::Size(size) => vec![size.to_token()],
            Self::Keyword(keyword) => vec![CSSToken::ident(keyword.as_str())],
            Self::String(text) => vec![CSSToken::string(text.as_str())],
            Self::WordList(words) if words.is_empty() => vec![CSSToken::ident("none")],
            Self::WordList(words) => {
                let mut tokens = Vec::with_capacity(words.len() * 2);
                for (i, word) in words.iter().enumerate() {
                    if i > 0 {
                        tokens.push(CSSToken::Whitespace);
                    }
                    tokens.push(if is_plain_identifier(word) {
                        CSSToken::ident(word.as_str())
                    } else {
                        CSSToken::string(word.as_str())
                    });
                }
                tokens
            }
            Self::Boolean(value) => vec![CSSToken::ident(if *value { "true" } else { "false" })],
            Self::Transforms(transforms) if transforms.is_empty() => vec![CSSToken::ident("none")],
            Self::Transforms(transforms) => {
                let mut tokens = Vec::new();
                for (i, transform) in transforms.iter().enumerate() {
                    if i > 0 {
                        tokens.push(CSSToken::Whitespace);
                    }
                    transform.write_tokens(&mut tokens);
                }
                tokens
            }
        }
    }

    /// The canonical CSS text of this value.
    #[must_use]
    pub fn to_css(&self) -> String {
        serialize_tokens(&self.to_tokens())
    }

    /// The text attribute selectors compare against: the canonical CSS text,
    /// except that strings are compared unquoted.
    #[must_use]
    pub fn to_attribute_text(&self) -> String {
        match self {
            Self::String(text) => text.clone(),
            other => other.to_css(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        assert_eq!(StyleValue::Color(ColorValue::rgb(255, 0, 0)).to_css(), "#ff0000");
        assert_eq!(StyleValue::Size(SizeValue::new(2.5, "px")).to_css(), "2.5px");
        assert_eq!(StyleValue::Size(SizeValue::new(50.0, "%")).to_css(), "50%");
        assert_eq!(StyleValue::Boolean(false).to_css(), "false");
        assert_eq!(StyleValue::WordList(Vec::new()).to_css(), "none");
        assert_eq!(
            StyleValue::Transforms(vec![Transform::translate(1.0, 2.0), Transform::rotate(45.0)])
                .to_css(),
            "translate(1, 2) rotate(45)"
        );
    }

    #[test]
    fn test_attribute_text_unquotes_strings() {
        let value = StyleValue::String("foobar".to_owned());
        assert_eq!(value.to_css(), "\"foobar\"");
        assert_eq!(value.to_attribute_text(), "foobar");
    }
}

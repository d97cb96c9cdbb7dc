use super::{Converter, unexpected};
use crate::error::ConversionError;
use crate::tokenizer::{CSSToken, TokenStream};
use crate::values::{ColorValue, SizeValue, StyleValue, Transform};

/// [CSS Color § 4](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// `#rgb`, `#rrggbb`, ..., `rgb()`, `rgba()` and named colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl Converter for ColorConverter {
    fn type_name(&self) -> &'static str {
        "color"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        ColorValue::parse(stream).map(StyleValue::Color)
    }
}

/// [CSS Values § 5.4](https://www.w3.org/TR/css-values-4/#numbers)
///
/// A plain `<number>`, optionally restricted to a closed range.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter {
    range: Option<(f64, f64)>,
}

impl NumberConverter {
    /// Accept any number.
    #[must_use]
    pub const fn new() -> Self {
        Self { range: None }
    }

    /// Accept numbers in `min..=max`.
    #[must_use]
    pub const fn in_range(min: f64, max: f64) -> Self {
        Self {
            range: Some((min, max)),
        }
    }
}

impl Converter for NumberConverter {
    fn type_name(&self) -> &'static str {
        "number"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        let CSSToken::Number { value, .. } = stream.next_non_whitespace() else {
            return Err(unexpected(stream, self.type_name()));
        };
        if let Some((min, max)) = self.range
            && !(min..=max).contains(value)
        {
            return Err(ConversionError::InvalidValue {
                message: format!("{value} is outside {min}..={max}"),
                position: stream.position(),
            });
        }
        Ok(StyleValue::Number(*value))
    }
}

/// [CSS Values § 6](https://www.w3.org/TR/css-values-4/#lengths)
///
/// A number, percentage or dimension. An empty unit list accepts any unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeConverter {
    units: &'static [&'static str],
}

impl SizeConverter {
    /// Accept any unit.
    #[must_use]
    pub const fn new() -> Self {
        Self { units: &[] }
    }

    /// Accept unitless values and the listed units (`"%"` for percentages).
    #[must_use]
    pub const fn with_units(units: &'static [&'static str]) -> Self {
        Self { units }
    }

    fn accepts(&self, unit: &str) -> bool {
        self.units.is_empty() || self.units.iter().any(|u| u.eq_ignore_ascii_case(unit))
    }
}

impl Converter for SizeConverter {
    fn type_name(&self) -> &'static str {
        "size"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        let size = match stream.next_non_whitespace() {
            CSSToken::Number { value, .. } => SizeValue::unitless(*value),
            CSSToken::Percentage { value, .. } => SizeValue::new(*value, "%"),
            CSSToken::Dimension { value, unit, .. } => {
                SizeValue::new(*value, unit.to_ascii_lowercase())
            }
            _ => return Err(unexpected(stream, self.type_name())),
        };
        if !size.unit.is_empty() && !self.accepts(&size.unit) {
            return Err(ConversionError::InvalidValue {
                message: format!("unit `{}` is not allowed here", size.unit),
                position: stream.position(),
            });
        }
        Ok(StyleValue::Size(size))
    }
}

/// One keyword out of a fixed set, matched ASCII case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct EnumConverter {
    keywords: &'static [&'static str],
}

impl EnumConverter {
    /// Accept exactly `keywords`, which should be lowercase.
    #[must_use]
    pub const fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }

    /// The accepted keywords.
    #[must_use]
    pub const fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }
}

impl Converter for EnumConverter {
    fn type_name(&self) -> &'static str {
        "keyword"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        let CSSToken::Ident(word) = stream.next_non_whitespace() else {
            return Err(unexpected(stream, self.type_name()));
        };
        self.keywords
            .iter()
            .find(|k| k.eq_ignore_ascii_case(word))
            .map(|k| StyleValue::Keyword((*k).to_owned()))
            .ok_or_else(|| ConversionError::InvalidValue {
                message: format!(
                    "`{word}` is not one of {}",
                    self.keywords.join(", ")
                ),
                position: stream.position(),
            })
    }
}

/// A quoted string. A bare identifier is accepted as its own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        match stream.next_non_whitespace() {
            CSSToken::String(text) | CSSToken::Ident(text) => Ok(StyleValue::String(text.clone())),
            _ => Err(unexpected(stream, self.type_name())),
        }
    }
}

/// Words separated by whitespace or commas; `none` is the empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordListConverter;

impl Converter for WordListConverter {
    fn type_name(&self) -> &'static str {
        "word list"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        stream.skip_whitespace();
        if stream.peek().is_ident("none") {
            let _ = stream.next();
            return Ok(StyleValue::WordList(Vec::new()));
        }

        let mut words = Vec::new();
        loop {
            match stream.next_non_whitespace() {
                CSSToken::Ident(word) | CSSToken::String(word) => words.push(word.clone()),
                CSSToken::Comma if !words.is_empty() => {}
                CSSToken::EOF if !words.is_empty() => {
                    stream.push_back();
                    return Ok(StyleValue::WordList(words));
                }
                _ => return Err(unexpected(stream, self.type_name())),
            }
        }
    }
}

/// `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl Converter for BooleanConverter {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        let token = stream.next_non_whitespace();
        if token.is_ident("true") {
            Ok(StyleValue::Boolean(true))
        } else if token.is_ident("false") {
            Ok(StyleValue::Boolean(false))
        } else {
            Err(unexpected(stream, self.type_name()))
        }
    }
}

/// `none` or a list of transform functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformListConverter;

impl Converter for TransformListConverter {
    fn type_name(&self) -> &'static str {
        "transform list"
    }

    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError> {
        Transform::parse_list(stream).map(StyleValue::Transforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenList;

    fn convert(converter: &dyn Converter, text: &str) -> Result<StyleValue, ConversionError> {
        converter.convert(TokenList::parse(text).tokens())
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert!(matches!(
            convert(&NumberConverter::new(), "1 2"),
            Err(ConversionError::UnexpectedToken { .. })
        ));
        assert_eq!(convert(&NumberConverter::new(), "  1.5  ").ok(), Some(StyleValue::Number(1.5)));
    }

    #[test]
    fn test_number_range() {
        let opacity = NumberConverter::in_range(0.0, 1.0);
        assert!(convert(&opacity, "0.5").is_ok());
        assert!(matches!(
            convert(&opacity, "2"),
            Err(ConversionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_size_units() {
        let converter = SizeConverter::with_units(&["px", "%"]);
        assert_eq!(
            convert(&converter, "10PX").ok(),
            Some(StyleValue::Size(SizeValue::new(10.0, "px")))
        );
        assert!(convert(&converter, "3em").is_err());
        assert_eq!(
            convert(&converter, "3").ok(),
            Some(StyleValue::Size(SizeValue::unitless(3.0)))
        );
    }

    #[test]
    fn test_enum_keywords_are_case_insensitive() {
        let converter = EnumConverter::new(&["butt", "round", "square"]);
        assert_eq!(
            convert(&converter, "Round").ok(),
            Some(StyleValue::Keyword("round".to_owned()))
        );
        assert!(convert(&converter, "pointy").is_err());
    }

    #[test]
    fn test_word_list() {
        assert_eq!(
            convert(&WordListConverter, "a, b \"c d\"").ok(),
            Some(StyleValue::WordList(vec!["a".into(), "b".into(), "c d".into()]))
        );
        assert_eq!(convert(&WordListConverter, "none").ok(), Some(StyleValue::WordList(Vec::new())));
        assert!(convert(&WordListConverter, "").is_err());
    }

    #[test]
    fn test_boolean() {
        assert_eq!(convert(&BooleanConverter, "TRUE").ok(), Some(StyleValue::Boolean(true)));
        assert!(convert(&BooleanConverter, "yes").is_err());
    }
}

//! Declaration value converters.
//!
//! A [`Converter`] reads a property value from declaration tokens and writes
//! a value back to tokens. Every property key carries one.

use core::fmt;

use crate::error::ConversionError;
use crate::tokenizer::{CSSToken, LocatedToken, TokenStream, serialize_tokens};
use crate::values::StyleValue;

mod converters;

pub use converters::{
    BooleanConverter, ColorConverter, EnumConverter, NumberConverter, SizeConverter,
    StringConverter, TransformListConverter, WordListConverter,
};

/// Converts between declaration tokens and a typed [`StyleValue`].
pub trait Converter: fmt::Debug + Send + Sync {
    /// Short description of the accepted values, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Read a value from `stream`. Trailing tokens are left for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the tokens do not form a value.
    fn parse(&self, stream: &mut TokenStream<'_>) -> Result<StyleValue, ConversionError>;

    /// The canonical tokens for `value`.
    fn to_tokens(&self, value: &StyleValue) -> Vec<CSSToken> {
        value.to_tokens()
    }

    /// The canonical CSS text for `value`.
    fn to_css(&self, value: &StyleValue) -> String {
        serialize_tokens(&self.to_tokens(value))
    }

    /// Convert a complete declaration value.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the tokens do not form a value, or if
    /// anything but whitespace follows it.
    fn convert(&self, tokens: &[LocatedToken]) -> Result<StyleValue, ConversionError> {
        let mut stream = TokenStream::new(tokens);
        let value = self.parse(&mut stream)?;
        expect_end(&mut stream)?;
        Ok(value)
    }
}

/// Fail unless only whitespace remains in `stream`.
///
/// # Errors
///
/// Returns [`ConversionError::UnexpectedToken`] naming the first extra token.
pub fn expect_end(stream: &mut TokenStream<'_>) -> Result<(), ConversionError> {
    match stream.next_non_whitespace() {
        CSSToken::EOF => Ok(()),
        other => Err(ConversionError::UnexpectedToken {
            expected: "end of value".to_owned(),
            found: other.to_css(),
            position: stream.position(),
        }),
    }
}

/// Build an [`ConversionError::UnexpectedToken`] for the current token.
pub(crate) fn unexpected(stream: &TokenStream<'_>, expected: &str) -> ConversionError {
    let found = match stream.current() {
        CSSToken::EOF => "end of value".to_owned(),
        token => token.to_css(),
    };
    ConversionError::UnexpectedToken {
        expected: expected.to_owned(),
        found,
        position: stream.position(),
    }
}

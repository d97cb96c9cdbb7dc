//! CSS tokenizer module.

/// Token serialization per [CSSOM § 2.1](https://www.w3.org/TR/cssom-1/#common-serializing-idioms).
pub mod serialize;
/// Token cursor with one-token pushback.
pub mod stream;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod tokenizer;

pub use serialize::{is_plain_identifier, serialize_tokens};
pub use stream::{TokenList, TokenStream};
pub use token::{CSSToken, HashType, LocatedToken, NumericType, Position};
pub use tokenizer::{CSSTokenizer, tokenize};

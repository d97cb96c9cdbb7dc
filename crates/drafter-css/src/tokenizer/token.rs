//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: `<ident-token>`, `<function-token>`, `<at-keyword-token>`,
//! `<hash-token>`, `<string-token>`, `<bad-string-token>`, `<url-token>`,
//! `<bad-url-token>`, `<delim-token>`, `<number-token>`, `<percentage-token>`,
//! `<dimension-token>`, `<unicode-range-token>`, `<whitespace-token>`,
//! `<CDO-token>`, `<CDC-token>`, `<colon-token>`, `<semicolon-token>`,
//! `<comma-token>`, `<[-token>`, `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`,
//! and `<}-token>`."
//!
//! Attribute-selector operators (`~=`, `|=`, `^=`, `$=`, `*=`) and the column
//! combinator (`||`) are produced as their own tokens, as in
//! [CSS 2.1 § G.2](https://www.w3.org/TR/CSS21/grammar.html#scanner), so the
//! selector parser never has to glue two delimiters together.

use core::fmt;

use serde::Serialize;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericType {
    /// "integer" - the number is an integer
    Integer,
    /// "number" - the number has a decimal point or exponent
    Number,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// CSS tokens as defined by the CSS Syntax Module Level 3 specification,
/// plus the CSS 2.1 attribute match operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CSSToken {
    /// "`<ident-token>`"
    /// "has a value composed of one or more code points"
    Ident(String),

    /// "`<function-token>`"
    /// "has a value composed of one or more code points, followed by U+0028 LEFT PARENTHESIS"
    Function(String),

    /// "`<at-keyword-token>`"
    /// "has a value composed of one or more code points, preceded by U+0040 COMMERCIAL AT (@)"
    AtKeyword(String),

    /// "`<hash-token>`"
    /// "has a value composed of one or more code points, preceded by U+0023 NUMBER SIGN (#)"
    Hash {
        /// "a value composed of one or more code points"
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "`<string-token>`"
    /// "has a value composed of zero or more code points"
    String(String),

    /// "`<bad-string-token>`"
    /// "represents a parsing error"
    BadString,

    /// "`<url-token>`"
    /// "has a value composed of zero or more code points"
    Url(String),

    /// "`<bad-url-token>`"
    /// "represents a parsing error"
    BadUrl,

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    Delim(char),

    /// "`<number-token>`"
    /// "has a numeric value, and a type flag set to either 'integer' or 'number'"
    Number {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
    },

    /// "`<percentage-token>`"
    /// "has a numeric value, and a type flag set to either 'integer' or 'number'"
    Percentage {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
    },

    /// "`<dimension-token>`"
    /// "has a numeric value, a type flag, and a unit"
    Dimension {
        /// "a numeric value"
        value: f64,
        /// The integer value if this is an integer type.
        int_value: Option<i64>,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
        /// "a unit"
        unit: String,
    },

    /// "`<unicode-range-token>`"
    /// "has a start and an end, both integers"
    UnicodeRange {
        /// First code point of the range.
        start: u32,
        /// Last code point of the range (inclusive).
        end: u32,
    },

    /// `~=` (CSS 2.1 INCLUDES)
    IncludeMatch,

    /// `|=` (CSS 2.1 DASHMATCH)
    DashMatch,

    /// `^=` (CSS 3 PREFIXMATCH)
    PrefixMatch,

    /// `$=` (CSS 3 SUFFIXMATCH)
    SuffixMatch,

    /// `*=` (CSS 3 SUBSTRINGMATCH)
    SubstringMatch,

    /// `||` column combinator
    Column,

    /// "`<whitespace-token>`"
    /// "represents one or more whitespace code points"
    Whitespace,

    /// "`<CDO-token>`"
    /// "represents the character sequence U+003C U+0021 U+002D U+002D (<!--)"
    CDO,

    /// "`<CDC-token>`"
    /// "represents the character sequence U+002D U+002D U+003E (-->)"
    CDC,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// `<[-token>`
    LeftBracket,

    /// `<]-token>`
    RightBracket,

    /// `<(-token>`
    LeftParen,

    /// `<)-token>`
    RightParen,

    /// `<{-token>`
    LeftBrace,

    /// `<}-token>`
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl CSSToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        }
    }

    /// Create a new hash token with unrestricted type.
    #[must_use]
    pub fn hash_unrestricted(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Unrestricted,
        }
    }

    /// Create a new string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a new number token (integer).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn integer(value: i64) -> Self {
        Self::Number {
            value: value as f64,
            int_value: Some(value),
            numeric_type: NumericType::Integer,
        }
    }

    /// Create a number token, choosing the integer flag when `value` is integral.
    ///
    /// Converters use this when writing values back to tokens.
    #[must_use]
    pub fn number(value: f64) -> Self {
        let (int_value, numeric_type) = numeric_flags(value);
        Self::Number {
            value,
            int_value,
            numeric_type,
        }
    }

    /// Create a new dimension token.
    #[must_use]
    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        let (int_value, numeric_type) = numeric_flags(value);
        Self::Dimension {
            value,
            int_value,
            numeric_type,
            unit: unit.into(),
        }
    }

    /// Create a new percentage token.
    #[must_use]
    pub fn percentage(value: f64) -> Self {
        let (int_value, numeric_type) = numeric_flags(value);
        Self::Percentage {
            value,
            int_value,
            numeric_type,
        }
    }

    /// Create a new delim token.
    #[must_use]
    pub const fn delim(c: char) -> Self {
        Self::Delim(c)
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns the numeric value of number, percentage, and dimension tokens.
    #[must_use]
    pub const fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. }
            | Self::Percentage { value, .. }
            | Self::Dimension { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Returns true if this is an ident token matching `keyword` (ASCII case-insensitive).
    #[must_use]
    pub fn is_ident(&self, keyword: &str) -> bool {
        matches!(self, Self::Ident(v) if v.eq_ignore_ascii_case(keyword))
    }
}

/// Integer flag for a value written back by a converter: integral values
/// within `i64` precision serialize without a fraction.
#[allow(clippy::cast_possible_truncation)]
fn numeric_flags(value: f64) -> (Option<i64>, NumericType) {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        (Some(value as i64), NumericType::Integer)
    } else {
        (None, NumericType::Number)
    }
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Url(v) => write!(f, "<url:{v}>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number { value, .. } => write!(f, "<number:{value}>"),
            Self::Percentage { value, .. } => write!(f, "<percentage:{value}%>"),
            Self::Dimension { value, unit, .. } => write!(f, "<dimension:{value}{unit}>"),
            Self::UnicodeRange { start, end } => write!(f, "<unicode-range:U+{start:X}-{end:X}>"),
            Self::IncludeMatch => write!(f, "<~=>"),
            Self::DashMatch => write!(f, "<|=>"),
            Self::PrefixMatch => write!(f, "<^=>"),
            Self::SuffixMatch => write!(f, "<$=>"),
            Self::SubstringMatch => write!(f, "<*=>"),
            Self::Column => write!(f, "<||>"),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::CDO => write!(f, "<CDO>"),
            Self::CDC => write!(f, "<CDC>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}

/// A location in the source text, used for diagnostics.
///
/// Lines and columns are 1-based; `offset` counts code points from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Code point offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token together with the position where it started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedToken {
    /// The token itself.
    pub token: CSSToken,
    /// Where the token's first code point was found.
    pub position: Position,
}

impl LocatedToken {
    /// Attach a position to a token.
    #[must_use]
    pub const fn new(token: CSSToken, position: Position) -> Self {
        Self { token, position }
    }

    /// Wrap a synthesized token that has no source location.
    #[must_use]
    pub fn unlocated(token: CSSToken) -> Self {
        Self {
            token,
            position: Position::default(),
        }
    }
}

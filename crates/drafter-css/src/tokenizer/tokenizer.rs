use super::token::{CSSToken, HashType, LocatedToken, NumericType, Position};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification, with
/// the CSS 2.1 match operators and `<unicode-range-token>` added. Every token
/// records the position of its first code point.
pub struct CSSTokenizer {
    /// The preprocessed input being tokenized
    input: Vec<char>,
    /// Offsets at which each line starts, for position lookup
    line_starts: Vec<usize>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<LocatedToken>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    ///
    /// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
    ///
    /// "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED (FF)
    /// code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by U+000A
    /// LINE FEED (LF) in input by a single U+000A LINE FEED (LF) code point.
    /// Replace any U+0000 NULL or surrogate code points in input with U+FFFD
    /// REPLACEMENT CHARACTER."
    pub fn new(input: impl Into<String>) -> Self {
        let raw: String = input.into();
        let mut chars = Vec::with_capacity(raw.len());
        let mut iter = raw.chars().peekable();
        while let Some(c) = iter.next() {
            match c {
                '\r' => {
                    if iter.peek() == Some(&'\n') {
                        let _ = iter.next();
                    }
                    chars.push('\n');
                }
                '\x0C' => chars.push('\n'),
                '\0' => chars.push('\u{FFFD}'),
                c => chars.push(c),
            }
        }

        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == '\n')
                .map(|(i, _)| i + 1),
        );

        Self {
            input: chars,
            line_starts,
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    ///
    /// Runs until EOF; the final collected token is always [`CSSToken::EOF`].
    pub fn run(&mut self) {
        loop {
            // Comments are not tokens, so the position is taken after them.
            self.consume_comments();
            let position = self.position_at(self.position);
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(LocatedToken::new(token, position));
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens without positions.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens.into_iter().map(|t| t.token).collect()
    }

    /// Return the collected tokens with their source positions.
    #[must_use]
    pub fn into_located_tokens(self) -> Vec<LocatedToken> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[LocatedToken] {
        &self.tokens
    }

    /// Translate a code point offset into a line/column position.
    fn position_at(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        Position {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        // "Consume the next input code point."
        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")"
            // "Consume a string token and return it."
            '"' => self.consume_string_token('"'),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };

                    // "Consume an ident sequence, and set the <hash-token>'s value
                    // to the returned string."
                    let value = self.consume_ident_sequence();

                    CSSToken::Hash { value, hash_type }
                } else {
                    // "Otherwise, return a <delim-token> with its value set to the
                    // current input code point."
                    CSSToken::Delim('#')
                }
            }

            // CSS 2.1 SUFFIXMATCH
            '$' => self.consume_match_operator('$', CSSToken::SuffixMatch),

            // "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '\'' => self.consume_string_token('\''),

            // "U+0028 LEFT PARENTHESIS (()"
            '(' => CSSToken::LeftParen,

            // "U+0029 RIGHT PARENTHESIS ())"
            ')' => CSSToken::RightParen,

            // CSS 2.1 SUBSTRINGMATCH
            '*' => self.consume_match_operator('*', CSSToken::SubstringMatch),

            // "U+002B PLUS SIGN (+)"
            '+' => {
                // "If the input stream starts with a number..."
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('+')
                }
            }

            // "U+002C COMMA (,)"
            ',' => CSSToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.advance(2);
                    CSSToken::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if self.would_start_ident_sequence_with(Some('-')) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('.')
                }
            }

            // "U+003A COLON (:)"
            ':' => CSSToken::Colon,

            // "U+003B SEMICOLON (;)"
            ';' => CSSToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                // "If the next 3 input code points are U+0021 U+002D U+002D (!--)..."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.advance(3);
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident_sequence() {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }

            // "U+005B LEFT SQUARE BRACKET ([)"
            '[' => CSSToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                // "If the input stream starts with a valid escape..."
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // "This is a parse error."
                    CSSToken::Delim('\\')
                }
            }

            // "U+005D RIGHT SQUARE BRACKET (])"
            ']' => CSSToken::RightBracket,

            // CSS 2.1 PREFIXMATCH
            '^' => self.consume_match_operator('^', CSSToken::PrefixMatch),

            // "U+007B LEFT CURLY BRACKET ({)"
            '{' => CSSToken::LeftBrace,

            // "U+007C VERTICAL LINE (|)"
            '|' => {
                if self.peek() == Some('|') {
                    self.advance(1);
                    CSSToken::Column
                } else {
                    self.consume_match_operator('|', CSSToken::DashMatch)
                }
            }

            // "U+007D RIGHT CURLY BRACKET (})"
            '}' => CSSToken::RightBrace,

            // CSS 2.1 INCLUDES
            '~' => self.consume_match_operator('~', CSSToken::IncludeMatch),

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "U+0055 LATIN CAPITAL LETTER U (U)" or "U+0075 LATIN SMALL LETTER U (u)"
            // "If the next two input code points are U+002B PLUS SIGN (+) followed by a
            // hex digit or U+003F QUESTION MARK (?), consume the next input code point.
            // Consume a unicode-range token and return it."
            'u' | 'U'
                if self.peek() == Some('+')
                    && self.peek_at(1).is_some_and(|c| c.is_ascii_hexdigit() || c == '?') =>
            {
                self.advance(1);
                self.consume_unicode_range_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }

            // "anything else"
            c => CSSToken::Delim(c),
        }
    }

    /// Produce `operator` when the next code point is `=`, otherwise a delim.
    fn consume_match_operator(&mut self, delim: char, operator: CSSToken) -> CSSToken {
        if self.peek() == Some('=') {
            self.advance(1);
            operator
        } else {
            CSSToken::Delim(delim)
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "If the next two input code points are U+002F SOLIDUS (/) followed by
    /// U+002A ASTERISK (*), consume them and all following code points up to
    /// and including the first U+002A ASTERISK (*) followed by U+002F SOLIDUS (/),
    /// or up to an EOF code point."
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.advance(2);

            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.advance(1);
                        break;
                    }
                    Some(_) => {}
                    None => break,
                }
            }
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.advance(1);
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                // EOF is a parse error, but the string is still returned.
                Some(c) if c == ending_code_point => return CSSToken::String(value),
                None => return CSSToken::String(value),

                // "newline"
                // "This is a parse error. Reconsume the current input code point,
                // create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\n') => self.advance(1),
                    // "Otherwise, (the stream starts with a valid escape) consume an
                    // escaped code point and append the returned code point to the
                    // <string-token>'s value."
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let (value, int_value, numeric_type) = self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension {
                value,
                int_value,
                numeric_type,
                unit,
            }
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE SIGN (%)..."
        else if self.peek() == Some('%') {
            self.advance(1);
            CSSToken::Percentage {
                value,
                int_value,
                numeric_type,
            }
        } else {
            CSSToken::Number {
                value,
                int_value,
                numeric_type,
            }
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()"
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            self.advance(1);
            self.consume_whitespace();

            // "If the next one or two input code points are U+0022 QUOTATION MARK,
            // U+0027 APOSTROPHE..."
            if matches!(self.peek(), Some('"' | '\'')) {
                CSSToken::Function(string)
            } else {
                self.consume_url_token()
            }
        } else if self.peek() == Some('(') {
            self.advance(1);
            CSSToken::Function(string)
        } else {
            CSSToken::Ident(string)
        }
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                // "U+0029 RIGHT PARENTHESIS ())" / "EOF"
                Some(')') | None => return CSSToken::Url(value),

                // "whitespace"
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.advance(1);
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        _ => {
                            self.consume_bad_url_remnants();
                            CSSToken::BadUrl
                        }
                    };
                }

                // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE ('), U+0028 LEFT
                // PARENTHESIS ((), or non-printable code point"
                Some(c) if matches!(c, '"' | '\'' | '(') || is_non_printable(c) => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [CSS Syntax 3 (2014) § 4.3.6 Consume a unicode-range token](https://www.w3.org/TR/2014/CR-css-syntax-3-20140220/#consume-a-unicode-range-token)
    ///
    /// "Consume as many hex digits as possible, but no more than 6. If less than 6
    /// hex digits were consumed, consume as many U+003F QUESTION MARK (?) code
    /// points as possible, but no more than enough to make the total of hex digits
    /// and U+003F QUESTION MARK (?) code points equal to 6."
    fn consume_unicode_range_token(&mut self) -> CSSToken {
        let mut digits = self.consume_hex_digits(6);
        let mut question_marks = 0;
        while digits.len() + question_marks < 6 && self.peek() == Some('?') {
            self.advance(1);
            question_marks += 1;
        }

        if question_marks > 0 {
            // "Interpret the consumed code points as a hexadecimal number, with the
            // U+003F QUESTION MARK (?) code points replaced by U+0030 DIGIT ZERO (0)
            // ... and again with U+0046 LATIN CAPITAL LETTER F (F)."
            let mut high = digits.clone();
            digits.extend(std::iter::repeat_n('0', question_marks));
            high.extend(std::iter::repeat_n('F', question_marks));
            return CSSToken::UnicodeRange {
                start: parse_hex(&digits),
                end: parse_hex(&high),
            };
        }

        let start = parse_hex(&digits);

        // "If the next 2 input code points are U+002D HYPHEN-MINUS (-) followed by a
        // hex digit, consume the next input code point. Consume as many hex digits
        // as possible, but no more than 6."
        let end = if self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance(1);
            parse_hex(&self.consume_hex_digits(6))
        } else {
            start
        };

        CSSToken::UnicodeRange { start, end }
    }

    /// Consume up to `max` hex digits.
    fn consume_hex_digits(&mut self, max: usize) -> String {
        let mut hex = String::new();
        while hex.len() < max {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance(1);
                }
                _ => break,
            }
        }
        hex
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),

                // "the stream starts with a valid escape"
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    result.push(self.consume_escaped_code_point());
                }

                // "anything else"
                // "Reconsume the current input code point. Return result."
                Some(_) => {
                    self.reconsume();
                    return result;
                }

                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (f64, Option<i64>, NumericType) {
        // "Initially set type to 'integer'. Let repr be the empty string."
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D HYPHEN-MINUS (-),
        // consume it and append it to repr."
        if matches!(self.peek(), Some('+' | '-')) {
            self.consume_into(&mut repr, 1);
        }

        self.consume_digits_into(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.consume_into(&mut repr, 2);
            numeric_type = NumericType::Number;
            self.consume_digits_into(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 LATIN CAPITAL LETTER E (E)
        // or U+0065 LATIN SMALL LETTER E (e), optionally followed by U+002D HYPHEN-MINUS (-)
        // or U+002B PLUS SIGN (+), followed by a digit..."
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_offset = if has_sign { 2 } else { 1 };

            if self.peek_at(digit_offset).is_some_and(|c| c.is_ascii_digit()) {
                self.consume_into(&mut repr, digit_offset + 1);
                numeric_type = NumericType::Number;
                self.consume_digits_into(&mut repr);
            }
        }

        // "Convert repr to a number, and set the value to the returned value."
        let value: f64 = repr.parse().unwrap_or(0.0);
        let int_value = if numeric_type == NumericType::Integer {
            repr.parse().ok()
        } else {
            None
        };

        (value, int_value, numeric_type)
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            // "hex digit"
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume();
                // "Consume as many hex digits as possible, but no more than 5."
                // (The first digit plus five more.)
                let hex = self.consume_hex_digits(6);
                // "If the next input code point is whitespace, consume it."
                if self.peek().is_some_and(is_whitespace) {
                    self.advance(1);
                }
                // "If this number is zero, or is for a surrogate, or is greater than the
                // maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
                let code_point = parse_hex(&hex);
                if code_point == 0 {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code_point).unwrap_or('\u{FFFD}')
                }
            }
            // "EOF"
            // "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => '\u{FFFD}',
            // "anything else"
            Some(c) => c,
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        self.would_start_ident_sequence_with(self.peek())
    }

    /// Like [`Self::would_start_ident_sequence`], with `first` standing in for the
    /// next code point.
    fn would_start_ident_sequence_with(&self, first: Option<char>) -> bool {
        match first {
            // "U+002D HYPHEN-MINUS"
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(is_ident_start_code_point)
                    || second == Some('-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            Some(c) if is_ident_start_code_point(c) => true,
            // "U+005C REVERSE SOLIDUS (\)"
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        match self.peek() {
            Some('+' | '-') => match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            },
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Consume `count` code points, appending them to `repr`.
    fn consume_into(&mut self, repr: &mut String, count: usize) {
        for _ in 0..count {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
        }
    }

    /// Consume a run of ASCII digits, appending them to `repr`.
    fn consume_digits_into(&mut self, repr: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            repr.push(c);
            self.advance(1);
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Skip `count` characters that the caller has already peeked at.
    fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.input.len());
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Tokenize `input`, returning the located tokens terminated by EOF.
#[must_use]
pub fn tokenize(input: &str) -> Vec<LocatedToken> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_located_tokens()
}

fn parse_hex(digits: &str) -> u32 {
    u32::from_str_radix(digits, 16).unwrap_or(0)
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
///
/// "If the first code point is not U+005C REVERSE SOLIDUS (\), return false.
/// Otherwise, if the second code point is a newline, return false.
/// Otherwise, return true."
pub(crate) fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
///
/// "A code point between U+0000 NULL and U+0008 BACKSPACE inclusive, or U+000B
/// LINE TABULATION, or a code point between U+000E SHIFT OUT and U+001F
/// INFORMATION SEPARATOR ONE inclusive, or U+007F DELETE."
pub(crate) const fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
pub(crate) const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
pub(crate) const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracks_lines_and_columns() {
        let tokens = tokenize("a\n  b");
        assert_eq!(tokens[0].position, Position { offset: 0, line: 1, column: 1 });
        assert_eq!(tokens[2].position, Position { offset: 4, line: 2, column: 3 });
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let tokens = tokenize("a\r\nb");
        assert_eq!(tokens[2].position.line, 2);
        assert_eq!(tokens[2].position.column, 1);
    }

    #[test]
    fn test_position_skips_comments() {
        let tokens = tokenize("/* x */a");
        assert_eq!(tokens[0].token, CSSToken::ident("a"));
        assert_eq!(tokens[0].position.offset, 7);
    }

    #[test]
    fn test_non_printable_detection() {
        assert!(is_non_printable('\x01'));
        assert!(is_non_printable('\x7F'));
        assert!(!is_non_printable('\t'));
        assert!(!is_non_printable('a'));
    }
}

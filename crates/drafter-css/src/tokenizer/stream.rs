//! Cursor over a token list with one-token pushback.

use super::token::{CSSToken, LocatedToken, Position};
use super::tokenizer::tokenize;

/// Shared EOF returned once the stream is exhausted.
static EOF: LocatedToken = LocatedToken {
    token: CSSToken::EOF,
    position: Position {
        offset: 0,
        line: 1,
        column: 1,
    },
};

/// A cursor over tokens, consumed one at a time.
///
/// After [`TokenStream::next`] the returned token is the *current* token;
/// [`TokenStream::push_back`] makes the following `next` return it again.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [LocatedToken],
    /// Index of the next token to hand out.
    index: usize,
}

impl<'a> TokenStream<'a> {
    /// Create a stream over already tokenized input.
    #[must_use]
    pub const fn new(tokens: &'a [LocatedToken]) -> Self {
        Self { tokens, index: 0 }
    }

    /// Advance and return the next token. Returns EOF forever once exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &'a CSSToken {
        let token = self.located(self.index);
        self.index += 1;
        &token.token
    }

    /// Advance past whitespace and return the next significant token.
    pub fn next_non_whitespace(&mut self) -> &'a CSSToken {
        loop {
            let token = self.next();
            if !token.is_whitespace() {
                return token;
            }
        }
    }

    /// The token most recently returned by [`Self::next`], or EOF before the first call.
    #[must_use]
    pub fn current(&self) -> &'a CSSToken {
        match self.index.checked_sub(1) {
            Some(i) => &self.located(i).token,
            None => &EOF.token,
        }
    }

    /// Peek at the token `next` would return, without consuming it.
    #[must_use]
    pub fn peek(&self) -> &'a CSSToken {
        &self.located(self.index).token
    }

    /// Un-consume the current token so the next call to [`Self::next`] returns it again.
    pub fn push_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Position of the current token, for diagnostics.
    #[must_use]
    pub fn position(&self) -> Position {
        match self.index.checked_sub(1) {
            Some(i) => self.located(i).position,
            None => self.located(0).position,
        }
    }

    /// Skip any whitespace tokens.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.index += 1;
        }
    }

    /// Whether only whitespace and EOF remain.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.tokens[self.index.min(self.tokens.len())..]
            .iter()
            .all(|t| t.token.is_whitespace() || t.token.is_eof())
    }

    /// The remaining tokens, not including the current one.
    #[must_use]
    pub fn remaining(&self) -> &'a [LocatedToken] {
        &self.tokens[self.index.min(self.tokens.len())..]
    }

    fn located(&self, index: usize) -> &'a LocatedToken {
        match self.tokens.get(index) {
            Some(token) => token,
            // Past the end, report EOF at the last known position.
            None => self.tokens.last().filter(|t| t.token.is_eof()).unwrap_or(&EOF),
        }
    }
}

/// Owned tokens of a source text, from which [`TokenStream`]s can be borrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenList {
    tokens: Vec<LocatedToken>,
}

impl TokenList {
    /// Tokenize `input`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self {
            tokens: tokenize(input),
        }
    }

    /// Wrap tokens produced elsewhere, e.g. by a converter.
    #[must_use]
    pub fn from_tokens(tokens: impl IntoIterator<Item = CSSToken>) -> Self {
        Self {
            tokens: tokens.into_iter().map(LocatedToken::unlocated).collect(),
        }
    }

    /// Borrow a stream positioned at the first token.
    #[must_use]
    pub fn stream(&self) -> TokenStream<'_> {
        TokenStream::new(&self.tokens)
    }

    /// The located tokens.
    #[must_use]
    pub fn tokens(&self) -> &[LocatedToken] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_back_returns_same_token() {
        let list = TokenList::parse("a b");
        let mut stream = list.stream();
        assert_eq!(stream.next(), &CSSToken::ident("a"));
        stream.push_back();
        assert_eq!(stream.next(), &CSSToken::ident("a"));
        assert_eq!(stream.current(), &CSSToken::ident("a"));
        assert_eq!(stream.next_non_whitespace(), &CSSToken::ident("b"));
        assert!(stream.next().is_eof());
        assert!(stream.next().is_eof());
    }

    #[test]
    fn test_position_follows_current_token() {
        let list = TokenList::parse("a  b");
        let mut stream = list.stream();
        let _ = stream.next_non_whitespace();
        let _ = stream.next_non_whitespace();
        assert_eq!(stream.position().column, 4);
    }
}

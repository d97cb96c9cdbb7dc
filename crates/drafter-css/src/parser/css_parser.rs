//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! Qualified rules have their prelude parsed as a selector group; declaration
//! values are kept as located tokens for the converters.

use serde::Serialize;

use crate::cascade::StyleOrigin;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::selector::parser::SelectorParser;
use crate::selector::{NamespaceMap, SelectorGroup};
use crate::tokenizer::{CSSToken, LocatedToken, Position, TokenStream, tokenize};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// A CSS declaration (e.g., `fill: red`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// Namespace of the property: `None` when unprefixed, the resolved URI
    /// for `ns|name`.
    pub namespace: Option<String>,
    /// The property name.
    pub name: String,
    /// The property value tokens, without `!important` and surrounding whitespace.
    pub value: Vec<LocatedToken>,
    /// Whether the declaration has `!important`.
    pub important: bool,
    /// Where the property name starts.
    pub position: Position,
}

impl Declaration {
    /// The name as written, with the namespace URI if there is one.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}|{}", self.name),
            None => self.name.clone(),
        }
    }

    /// The value as CSS text.
    #[must_use]
    pub fn value_text(&self) -> String {
        crate::tokenizer::serialize_tokens(self.value.iter().map(|t| &t.token))
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A CSS style rule (selector group + declarations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    /// The rule's selectors.
    pub selectors: SelectorGroup,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
    /// Where the rule's prelude starts.
    pub position: Position,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
///
/// A CSS at-rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude tokens.
    pub prelude: Vec<LocatedToken>,
    /// The optional block contents, without the braces.
    pub block: Option<Vec<LocatedToken>>,
    /// Where the at-keyword starts.
    pub position: Position,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// A CSS rule (either a style rule or an at-rule).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stylesheet {
    /// The list of rules in the stylesheet.
    pub rules: Vec<Rule>,
    /// The origin every rule belongs to.
    pub origin: StyleOrigin,
    /// Source name, if any.
    pub source: Option<String>,
    /// Recoverable errors met while parsing.
    pub errors: Vec<ParseError>,
}

impl Stylesheet {
    /// Iterate over the style rules, skipping at-rules.
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Style(style) => Some(style),
            Rule::At(_) => None,
        })
    }
}

/// Tokenize and parse `text` as a stylesheet.
#[must_use]
pub fn parse_stylesheet(text: &str, config: ParserConfig) -> Stylesheet {
    CSSParser::new(tokenize(text), config).parse_stylesheet()
}

/// Tokenize and parse `text` as a declaration list, e.g. a `style` attribute.
#[must_use]
pub fn parse_declaration_list(text: &str) -> (Vec<Declaration>, Vec<ParseError>) {
    let mut parser = CSSParser::new(tokenize(text), ParserConfig::default());
    let declarations = parser.parse_declaration_list();
    (declarations, parser.errors)
}

/// CSS parser
pub struct CSSParser {
    tokens: Vec<LocatedToken>,
    position: usize,
    config: ParserConfig,
    namespaces: NamespaceMap,
    errors: Vec<ParseError>,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub fn new(tokens: Vec<LocatedToken>, config: ParserConfig) -> Self {
        Self {
            tokens,
            position: 0,
            config,
            namespaces: NamespaceMap::default(),
            errors: Vec::new(),
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "To parse a stylesheet from input..."
    #[must_use]
    pub fn parse_stylesheet(mut self) -> Stylesheet {
        log::trace!("parse_stylesheet {}", self.config.source_name());

        // "Consume a list of rules from input, with the top-level flag set."
        let rules = self.consume_list_of_rules();
        Stylesheet {
            rules,
            origin: self.config.origin,
            source: self.config.source,
            errors: self.errors,
        }
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a style attribute or similar.
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.consume_list_of_declarations()
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record(&mut self, error: ParseError) {
        log::debug!("{}: {error}", self.config.source_name());
        if !self.config.ignore_errors {
            self.errors.push(error);
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_list_of_rules(&mut self) -> Vec<Rule> {
        log::trace!("consume_list_of_rules");

        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>" - "Do nothing."
                // "<CDO-token>" or "<CDC-token>" with the top-level flag set - "Do nothing."
                CSSToken::Whitespace | CSSToken::CDO | CSSToken::CDC => self.advance(),

                // "<EOF-token>" - "Return the list of rules."
                CSSToken::EOF => return rules,

                // "<at-keyword-token>"
                CSSToken::AtKeyword(_) => {
                    if let Some(at_rule) = self.consume_at_rule() {
                        if at_rule.name.eq_ignore_ascii_case("namespace") {
                            self.declare_namespace(&at_rule);
                        }
                        rules.push(Rule::At(at_rule));
                    }
                }

                // "anything else"
                _ => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [CSS Namespaces § 3](https://www.w3.org/TR/css-namespaces-3/#syntax)
    ///
    /// `@namespace <namespace-prefix>? [ <string> | <url> ] ;`
    fn declare_namespace(&mut self, rule: &AtRule) {
        let significant: Vec<&CSSToken> = rule
            .prelude
            .iter()
            .map(|t| &t.token)
            .filter(|t| !t.is_whitespace())
            .collect();

        let (prefix, uri) = match significant.as_slice() {
            [CSSToken::String(uri) | CSSToken::Url(uri)] => (None, uri),
            [CSSToken::Ident(prefix), CSSToken::String(uri) | CSSToken::Url(uri)] => {
                (Some(prefix.as_str()), uri)
            }
            _ => {
                self.record(ParseError::new("malformed @namespace rule", rule.position));
                return;
            }
        };

        log::debug!("@namespace {} = {uri}", prefix.unwrap_or("<default>"));
        self.namespaces.declare(prefix, uri.clone());
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        log::trace!("consume_at_rule");

        let position = self.current_position();
        let CSSToken::AtKeyword(name) = self.consume().token.clone() else {
            return None;
        };

        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<semicolon-token>" - "Return the at-rule."
                CSSToken::Semicolon => {
                    self.advance();
                    return Some(AtRule {
                        name,
                        prelude: trim_whitespace(prelude),
                        block: None,
                        position,
                    });
                }

                // "<EOF-token>" - "This is a parse error. Return the at-rule."
                CSSToken::EOF => {
                    self.record(ParseError::new(
                        format!("unterminated @{name} rule"),
                        position,
                    ));
                    return Some(AtRule {
                        name,
                        prelude: trim_whitespace(prelude),
                        block: None,
                        position,
                    });
                }

                // "<{-token>" - "Consume a simple block and assign it to the
                // at-rule's block. Return the at-rule."
                CSSToken::LeftBrace => {
                    let block = self.consume_simple_block();
                    return Some(AtRule {
                        name,
                        prelude: trim_whitespace(prelude),
                        block: Some(block),
                        position,
                    });
                }

                // "anything else" - "Consume a component value. Append the returned
                // value to the at-rule's prelude."
                _ => self.consume_component_value(&mut prelude),
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        log::trace!("consume_qualified_rule");

        let position = self.current_position();
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<EOF-token>" - "This is a parse error. Return nothing."
                CSSToken::EOF => {
                    self.record(ParseError::new("rule without a block", position));
                    return None;
                }

                // "<{-token>"
                CSSToken::LeftBrace => {
                    self.advance();

                    let mut selector_parser = SelectorParser::new(&self.namespaces);
                    let selectors = selector_parser.parse_group(&mut TokenStream::new(&prelude));
                    for error in selector_parser.into_errors() {
                        self.record(error);
                    }

                    let declarations = self.consume_list_of_declarations();

                    // Consume closing brace
                    if self.peek() == &CSSToken::RightBrace {
                        self.advance();
                    }

                    return Some(StyleRule {
                        selectors,
                        declarations,
                        position,
                    });
                }

                _ => self.consume_component_value(&mut prelude),
            }
        }
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Returns the tokens between the brackets.
    fn consume_simple_block(&mut self) -> Vec<LocatedToken> {
        let mut block = Vec::new();
        self.consume_component_value(&mut block);
        // Drop the opening and (if present) closing bracket.
        let closed = block.len() > 1
            && matches!(
                block.last().map(|t| &t.token),
                Some(CSSToken::RightBrace | CSSToken::RightBracket | CSSToken::RightParen)
            );
        if closed {
            let _ = block.pop();
        }
        if !block.is_empty() {
            let _ = block.remove(0);
        }
        block
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        log::trace!("consume_list_of_declarations");

        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>" or "<semicolon-token>" - "Do nothing."
                CSSToken::Whitespace | CSSToken::Semicolon => self.advance(),

                // "<EOF-token>" (and the end of the enclosing block)
                CSSToken::EOF | CSSToken::RightBrace => return declarations,

                // "<at-keyword-token>" - not valid inside a style block
                CSSToken::AtKeyword(_) => {
                    if let Some(rule) = self.consume_at_rule() {
                        self.record(ParseError::new(
                            format!("@{} is not allowed in a declaration list", rule.name),
                            rule.position,
                        ));
                    }
                }

                // "<ident-token>" (or a namespace prefix)
                CSSToken::Ident(_) | CSSToken::Delim('|' | '*') => {
                    if let Some(declaration) = self.consume_declaration() {
                        declarations.push(declaration);
                    }
                }

                // "anything else" - "This is a parse error. ... consume a component
                // value and throw away the returned value."
                other => {
                    let error = ParseError::new(
                        format!("unexpected '{}' in declaration list", other.to_css()),
                        self.current_position(),
                    );
                    self.record(error);
                    self.skip_declaration();
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Malformed declarations are recorded and skipped up to the next `;` or `}`.
    fn consume_declaration(&mut self) -> Option<Declaration> {
        log::trace!("consume_declaration");

        let position = self.current_position();
        let (namespace, name) = match self.consume_property_name() {
            Ok(qualified) => qualified,
            Err(error) => {
                self.record(error);
                self.skip_declaration();
                return None;
            }
        };

        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is
        // a parse error. Return nothing."
        if self.peek() != &CSSToken::Colon {
            let error = ParseError::new(
                format!("expected ':' after property '{name}'"),
                self.current_position(),
            );
            self.record(error);
            self.skip_declaration();
            return None;
        }
        self.advance();

        // "As long as the next input token is anything other than an <EOF-token>,
        // consume a component value and append it to the declaration's value."
        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace
        ) {
            self.consume_component_value(&mut value);
        }

        let (value, important) = split_important(value);
        if value.is_empty() {
            self.record(ParseError::new(
                format!("empty value for property '{name}'"),
                position,
            ));
            return None;
        }

        Some(Declaration {
            namespace,
            name,
            value,
            important,
            position,
        })
    }

    /// `name`, `ns|name` or `*|name`. `*|name` and `name` both leave the
    /// namespace open.
    fn consume_property_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let position = self.current_position();
        let first = self.consume().token.clone();
        let prefixed = self.peek() == &CSSToken::Delim('|');

        let namespace = match first {
            // `|name`: no namespace
            CSSToken::Delim('|') => Some(String::new()),
            CSSToken::Ident(name) if !prefixed => return Ok((None, name)),
            CSSToken::Ident(prefix) => {
                self.advance();
                let uri = self.namespaces.resolve(&prefix).ok_or_else(|| {
                    ParseError::new(format!("undeclared namespace prefix '{prefix}'"), position)
                })?;
                Some(uri.to_owned())
            }
            CSSToken::Delim('*') if prefixed => {
                self.advance();
                None
            }
            other => {
                return Err(ParseError::new(
                    format!("expected property name, found '{}'", other.to_css()),
                    position,
                ));
            }
        };

        match self.consume().token.clone() {
            CSSToken::Ident(name) => Ok((namespace, name)),
            other => Err(ParseError::new(
                format!("expected property name, found '{}'", other.to_css()),
                position,
            )),
        }
    }

    /// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Appends the tokens of one component value (a whole block or function
    /// including its closing token) to `out`.
    fn consume_component_value(&mut self, out: &mut Vec<LocatedToken>) {
        let first = self.consume().clone();
        let closing = match &first.token {
            CSSToken::LeftBrace => Some(CSSToken::RightBrace),
            CSSToken::LeftBracket => Some(CSSToken::RightBracket),
            CSSToken::LeftParen | CSSToken::Function(_) => Some(CSSToken::RightParen),
            CSSToken::EOF => return,
            _ => None,
        };
        out.push(first);

        if let Some(closing) = closing {
            loop {
                match self.peek() {
                    CSSToken::EOF => return,
                    token if *token == closing => {
                        out.push(self.consume().clone());
                        return;
                    }
                    _ => self.consume_component_value(out),
                }
            }
        }
    }

    /// Error recovery: skip component values up to the next `;`, `}` or EOF.
    fn skip_declaration(&mut self) {
        let mut discarded = Vec::new();
        while !matches!(
            self.peek(),
            CSSToken::EOF | CSSToken::Semicolon | CSSToken::RightBrace
        ) {
            self.consume_component_value(&mut discarded);
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn consume(&mut self) -> &LocatedToken {
        let index = self.position;
        self.position += 1;
        self.located(index)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn peek(&self) -> &CSSToken {
        &self.located(self.position).token
    }

    fn current_position(&self) -> Position {
        self.located(self.position).position
    }

    fn located(&self, index: usize) -> &LocatedToken {
        static EOF: LocatedToken = LocatedToken {
            token: CSSToken::EOF,
            position: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        };
        match self.tokens.get(index) {
            Some(token) => token,
            None => self.tokens.last().filter(|t| t.token.is_eof()).unwrap_or(&EOF),
        }
    }
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
///
/// Returns the value with the annotation and surrounding whitespace removed.
fn split_important(value: Vec<LocatedToken>) -> (Vec<LocatedToken>, bool) {
    let mut value = trim_whitespace(value);

    let significant: Vec<usize> = value
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, t)| !t.token.is_whitespace())
        .map(|(i, _)| i)
        .take(2)
        .collect();

    let important = match significant.as_slice() {
        [last, bang] => {
            value[*last].token.is_ident("important") && value[*bang].token == CSSToken::Delim('!')
        }
        _ => false,
    };

    if important {
        value.truncate(significant[1]);
        value = trim_whitespace(value);
    }
    (value, important)
}

/// Remove leading and trailing whitespace tokens.
fn trim_whitespace(mut tokens: Vec<LocatedToken>) -> Vec<LocatedToken> {
    while tokens.last().is_some_and(|t| t.token.is_whitespace()) {
        let _ = tokens.pop();
    }
    let leading = tokens.iter().take_while(|t| t.token.is_whitespace()).count();
    let _ = tokens.drain(..leading);
    tokens
}

use std::collections::HashMap;

use super::{AttributeMatcher, CombinatorKind, PseudoClassSelector, Selector, SelectorGroup};
use crate::error::ParseError;
use crate::tokenizer::{CSSToken, HashType, TokenList, TokenStream};

/// Namespace prefixes declared by `@namespace` rules.
///
/// [CSS Namespaces § 3](https://www.w3.org/TR/css-namespaces-3/#declaration)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    /// "If a default namespace is declared, it applies to type and universal
    /// selectors without a prefix." Never to attribute selectors.
    pub default: Option<String>,
    /// Declared prefix to namespace URI.
    pub prefixes: HashMap<String, String>,
}

impl NamespaceMap {
    /// Record a `@namespace` declaration. A later declaration of the same
    /// prefix replaces the earlier one.
    pub fn declare(&mut self, prefix: Option<&str>, uri: impl Into<String>) {
        match prefix {
            Some(prefix) => {
                let _ = self.prefixes.insert(prefix.to_owned(), uri.into());
            }
            None => self.default = Some(uri.into()),
        }
    }

    /// Resolve a declared prefix.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }
}

/// Parse `text` as a selector group with no namespaces declared.
///
/// Malformed alternatives become [`Selector::Nothing`].
#[must_use]
pub fn parse_selector_group(text: &str) -> SelectorGroup {
    let tokens = TokenList::parse(text);
    SelectorParser::new(&NamespaceMap::default()).parse_group(&mut tokens.stream())
}

/// Recursive-descent selector parser with one token of lookahead.
///
/// Grammar:
///
/// ```text
/// group    = selector ("," selector)*
/// selector = compound (combinator compound)*
/// compound = (type | universal)? (id | class | attribute | pseudo)*
/// ```
pub struct SelectorParser<'n> {
    namespaces: &'n NamespaceMap,
    errors: Vec<ParseError>,
}

impl<'n> SelectorParser<'n> {
    /// Create a parser resolving prefixes through `namespaces`.
    #[must_use]
    pub const fn new(namespaces: &'n NamespaceMap) -> Self {
        Self {
            namespaces,
            errors: Vec::new(),
        }
    }

    /// Errors recorded for alternatives that degraded to [`Selector::Nothing`].
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse alternatives until EOF. An alternative that fails to parse
    /// compiles to [`Selector::Nothing`] without affecting the others.
    pub fn parse_group(&mut self, stream: &mut TokenStream<'_>) -> SelectorGroup {
        log::trace!("parse_selector_group");

        let mut selectors = Vec::new();
        loop {
            match self.parse_selector(stream) {
                Ok(selector) => selectors.push(selector),
                Err(error) => {
                    log::debug!("invalid selector: {error}");
                    self.errors.push(error);
                    skip_to_next_alternative(stream);
                    selectors.push(Selector::Nothing);
                }
            }

            match stream.next() {
                CSSToken::Comma => {}
                _ => break,
            }
        }

        SelectorGroup::new(selectors)
    }

    /// `selector = compound (combinator compound)*`
    ///
    /// Leaves the terminating comma or EOF unconsumed.
    fn parse_selector(&mut self, stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_selector");

        stream.skip_whitespace();
        let mut selector = self.parse_compound(stream)?;

        loop {
            let saw_whitespace = stream.peek().is_whitespace();
            stream.skip_whitespace();

            let kind = match stream.peek() {
                CSSToken::Comma | CSSToken::EOF => return Ok(selector),
                CSSToken::Delim('>') => CombinatorKind::Child,
                CSSToken::Delim('+') => CombinatorKind::AdjacentSibling,
                CSSToken::Delim('~') => CombinatorKind::GeneralSibling,
                _ if saw_whitespace => CombinatorKind::Descendant,
                other => {
                    let _ = stream.next();
                    return Err(ParseError::new(
                        format!("unexpected {} in selector", other.to_css()),
                        stream.position(),
                    ));
                }
            };
            if kind != CombinatorKind::Descendant {
                let _ = stream.next();
                stream.skip_whitespace();
            }

            let next = self.parse_compound(stream)?;
            selector = Selector::combine(kind, selector, next);
        }
    }

    /// `compound = (type | universal)? (id | class | attribute | pseudo)*`
    fn parse_compound(&mut self, stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_compound_selector");

        let mut compound = self.parse_type_or_universal(stream)?;

        loop {
            let simple = match stream.peek() {
                CSSToken::Hash { .. } => Self::parse_id(stream)?,
                CSSToken::Delim('.') => Self::parse_class(stream)?,
                CSSToken::LeftBracket => self.parse_attribute(stream)?,
                CSSToken::Colon => Self::parse_pseudo_class(stream)?,
                _ => break,
            };
            compound = Some(match compound {
                Some(left) => Selector::combine(CombinatorKind::And, left, simple),
                None => simple,
            });
        }

        compound.ok_or_else(|| {
            let found = stream.next().to_css();
            ParseError::new(format!("expected selector, found '{found}'"), stream.position())
        })
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors) /
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// `ns|name`, `*|name`, `|name`, `name` and the same with `*` for the name.
    fn parse_type_or_universal(
        &mut self,
        stream: &mut TokenStream<'_>,
    ) -> Result<Option<Selector>, ParseError> {
        log::trace!("parse_type_selector");

        // Namespace prefix: `ident|`, `*|` or a bare `|`.
        let namespace = match (stream.peek(), peek_second(stream)) {
            (CSSToken::Delim('|'), _) => {
                let _ = stream.next();
                Some(Some(String::new()))
            }
            (CSSToken::Delim('*'), CSSToken::Delim('|')) => {
                let _ = stream.next();
                let _ = stream.next();
                Some(None)
            }
            (CSSToken::Ident(prefix), CSSToken::Delim('|')) => {
                let _ = stream.next();
                let _ = stream.next();
                let uri = self.resolve_prefix(prefix, stream)?;
                Some(Some(uri))
            }
            _ => None,
        };

        let explicit = namespace.is_some();
        // Unprefixed type and universal selectors pick up the default namespace.
        let namespace = namespace.unwrap_or_else(|| self.namespaces.default.clone());

        match stream.peek() {
            CSSToken::Ident(name) => {
                let _ = stream.next();
                Ok(Some(Selector::Type {
                    namespace,
                    name: name.clone(),
                }))
            }
            CSSToken::Delim('*') => {
                let _ = stream.next();
                Ok(Some(Selector::Universal { namespace }))
            }
            other if explicit => {
                let _ = stream.next();
                Err(ParseError::new(
                    format!("expected name after namespace prefix, found '{}'", other.to_css()),
                    stream.position(),
                ))
            }
            // No type selector; the compound may still have other parts.
            _ => Ok(None),
        }
    }

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    fn parse_id(stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_id_selector");

        match stream.next() {
            CSSToken::Hash {
                value,
                hash_type: HashType::Id,
            } => Ok(Selector::Id(value.clone())),
            other => Err(ParseError::new(
                format!("'{}' is not a valid id selector", other.to_css()),
                stream.position(),
            )),
        }
    }

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    fn parse_class(stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_class_selector");

        let _ = stream.next();
        match stream.next() {
            CSSToken::Ident(class) => Ok(Selector::Class(class.clone())),
            other => Err(ParseError::new(
                format!("expected class name after '.', found '{}'", other.to_css()),
                stream.position(),
            )),
        }
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// `[ns|name]`, `[name op value]`. Unprefixed attribute names are in no
    /// namespace; the default namespace does not apply.
    fn parse_attribute(&mut self, stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_attribute_selector");

        let _ = stream.next();
        stream.skip_whitespace();

        let namespace = match (stream.peek(), peek_second(stream)) {
            (CSSToken::Delim('|'), _) => {
                let _ = stream.next();
                Some(String::new())
            }
            (CSSToken::Delim('*'), CSSToken::Delim('|')) => {
                let _ = stream.next();
                let _ = stream.next();
                None
            }
            (CSSToken::Ident(prefix), CSSToken::Delim('|')) => {
                let _ = stream.next();
                let _ = stream.next();
                Some(self.resolve_prefix(prefix, stream)?)
            }
            _ => Some(String::new()),
        };

        let name = match stream.next() {
            CSSToken::Ident(name) => name.clone(),
            other => {
                return Err(ParseError::new(
                    format!("expected attribute name, found '{}'", other.to_css()),
                    stream.position(),
                ));
            }
        };

        let operator = stream.next_non_whitespace().clone();
        if operator == CSSToken::RightBracket {
            return Ok(Selector::Attribute {
                namespace,
                name,
                matcher: AttributeMatcher::Exists,
            });
        }

        let value = match stream.next_non_whitespace() {
            CSSToken::Ident(v) | CSSToken::String(v) => v.clone(),
            other => {
                return Err(ParseError::new(
                    format!("expected attribute value, found '{}'", other.to_css()),
                    stream.position(),
                ));
            }
        };

        let matcher = match operator {
            CSSToken::Delim('=') => AttributeMatcher::Equals(value),
            CSSToken::IncludeMatch => AttributeMatcher::Includes(value),
            CSSToken::DashMatch => AttributeMatcher::DashMatch(value),
            CSSToken::PrefixMatch => AttributeMatcher::Prefix(value),
            CSSToken::SuffixMatch => AttributeMatcher::Suffix(value),
            CSSToken::SubstringMatch => AttributeMatcher::Substring(value),
            other => {
                return Err(ParseError::new(
                    format!("expected attribute operator, found '{}'", other.to_css()),
                    stream.position(),
                ));
            }
        };

        match stream.next_non_whitespace() {
            CSSToken::RightBracket => Ok(Selector::Attribute {
                namespace,
                name,
                matcher,
            }),
            other => Err(ParseError::new(
                format!("expected ']', found '{}'", other.to_css()),
                stream.position(),
            )),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// "Like other selectors, pseudo-classes are ASCII case-insensitive."
    fn parse_pseudo_class(stream: &mut TokenStream<'_>) -> Result<Selector, ParseError> {
        log::trace!("parse_pseudo_class_selector");

        let _ = stream.next();
        match stream.next() {
            CSSToken::Ident(name) => Ok(Selector::PseudoClass(PseudoClassSelector::Simple(
                name.to_ascii_lowercase(),
            ))),
            CSSToken::Function(name) => {
                let name = name.to_ascii_lowercase();
                let arguments = collect_function_arguments(stream).ok_or_else(|| {
                    ParseError::new(format!("unterminated :{name}()"), stream.position())
                })?;
                Ok(Selector::PseudoClass(PseudoClassSelector::Function {
                    name,
                    arguments,
                }))
            }
            CSSToken::Colon => Err(ParseError::new(
                "pseudo-elements are not supported",
                stream.position(),
            )),
            other => Err(ParseError::new(
                format!("expected pseudo-class name, found '{}'", other.to_css()),
                stream.position(),
            )),
        }
    }

    fn resolve_prefix(&self, prefix: &str, stream: &TokenStream<'_>) -> Result<String, ParseError> {
        self.namespaces
            .resolve(prefix)
            .map(str::to_owned)
            .ok_or_else(|| {
                ParseError::new(
                    format!("undeclared namespace prefix '{prefix}'"),
                    stream.position(),
                )
            })
    }
}

/// Look one token past [`TokenStream::peek`].
fn peek_second<'a>(stream: &TokenStream<'a>) -> &'a CSSToken {
    let mut lookahead = stream.clone();
    let _ = lookahead.next();
    lookahead.next()
}

/// Collect the tokens up to the `)` closing a function, trimming surrounding
/// whitespace. Returns `None` at EOF.
fn collect_function_arguments(stream: &mut TokenStream<'_>) -> Option<Vec<CSSToken>> {
    let mut depth = 0usize;
    let mut arguments = Vec::new();
    loop {
        let token = stream.next();
        match token {
            CSSToken::EOF => return None,
            CSSToken::RightParen if depth == 0 => break,
            CSSToken::RightParen => depth -= 1,
            CSSToken::LeftParen | CSSToken::Function(_) => depth += 1,
            _ => {}
        }
        arguments.push(token.clone());
    }

    while arguments.last().is_some_and(CSSToken::is_whitespace) {
        let _ = arguments.pop();
    }
    let leading = arguments.iter().take_while(|t| t.is_whitespace()).count();
    let _ = arguments.drain(..leading);
    Some(arguments)
}

/// Error recovery: skip to the next top-level comma (left unconsumed) or EOF.
fn skip_to_next_alternative(stream: &mut TokenStream<'_>) {
    let mut depth = 0usize;
    loop {
        match stream.next() {
            CSSToken::EOF => {
                stream.push_back();
                return;
            }
            CSSToken::Comma if depth == 0 => {
                stream.push_back();
                return;
            }
            CSSToken::LeftParen
            | CSSToken::LeftBracket
            | CSSToken::LeftBrace
            | CSSToken::Function(_) => depth += 1,
            CSSToken::RightParen | CSSToken::RightBracket | CSSToken::RightBrace => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_second_does_not_consume() {
        let tokens = TokenList::parse("a|b");
        let stream = tokens.stream();
        assert_eq!(peek_second(&stream), &CSSToken::Delim('|'));
        assert_eq!(stream.peek(), &CSSToken::ident("a"));
    }

    #[test]
    fn test_function_arguments_are_trimmed() {
        let tokens = TokenList::parse(" en ) x");
        let mut stream = tokens.stream();
        let args = collect_function_arguments(&mut stream);
        assert_eq!(args, Some(vec![CSSToken::ident("en")]));
        assert_eq!(stream.next_non_whitespace(), &CSSToken::ident("x"));
    }
}

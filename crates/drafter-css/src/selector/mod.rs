//! CSS Selector AST, specificity and matching
//!
//! This module implements selectors per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) over any element
//! type that a [`SelectorModel`](crate::model::SelectorModel) can answer
//! questions about.
//!
//! A selector is a plain tree: simple selectors are leaves, and every
//! combinator owns exactly two operands. `a.b > c` is
//! `Child(And(Type(a), Class(b)), Type(c))`.

use core::fmt;
use core::ops::{Add, AddAssign};

use serde::Serialize;

use crate::tokenizer::{CSSToken, is_plain_identifier, serialize_tokens};

/// Selector matching against a [`SelectorModel`](crate::model::SelectorModel).
pub mod matching;
/// Recursive-descent selector parser over a token stream.
pub mod parser;

pub use parser::{NamespaceMap, parse_selector_group};

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// How an attribute's value is compared against the selector's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeMatcher {
    /// `[att]` - "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Exists,

    /// `[att=val]` - "Represents an element with the att attribute whose value
    /// is exactly 'val'."
    Equals(String),

    /// `[att~=val]` - "Represents an element with the att attribute whose value
    /// is a whitespace-separated list of words, one of which is exactly 'val'."
    Includes(String),

    /// `[att|=val]` - "its value either being exactly 'val' or beginning with
    /// 'val' immediately followed by '-' (U+002D)."
    DashMatch(String),

    /// `[att^=val]` - "whose value begins with the prefix 'val'."
    Prefix(String),

    /// `[att$=val]` - "whose value ends with the suffix 'val'."
    Suffix(String),

    /// `[att*=val]` - "whose value contains at least one instance of the
    /// substring 'val'."
    Substring(String),
}

impl AttributeMatcher {
    /// The operator as written in CSS, or `None` for [`Self::Exists`].
    #[must_use]
    pub const fn operator(&self) -> Option<&'static str> {
        match self {
            Self::Exists => None,
            Self::Equals(_) => Some("="),
            Self::Includes(_) => Some("~="),
            Self::DashMatch(_) => Some("|="),
            Self::Prefix(_) => Some("^="),
            Self::Suffix(_) => Some("$="),
            Self::Substring(_) => Some("*="),
        }
    }

    /// The value compared against, or `None` for [`Self::Exists`].
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Exists => None,
            Self::Equals(v)
            | Self::Includes(v)
            | Self::DashMatch(v)
            | Self::Prefix(v)
            | Self::Suffix(v)
            | Self::Substring(v) => Some(v),
        }
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PseudoClassSelector {
    /// `:name`
    Simple(String),
    /// `:name(arguments)`; the arguments are kept as raw tokens for the model
    /// to interpret.
    Function {
        /// Function name without the parenthesis.
        name: String,
        /// Tokens between the parentheses.
        arguments: Vec<CSSToken>,
    },
}

impl PseudoClassSelector {
    /// The pseudo-class name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(name) | Self::Function { name, .. } => name,
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// [`CombinatorKind::And`] is the implicit combinator joining the simple
/// selectors of a compound selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CombinatorKind {
    /// Both operands match the same element: `a.b`.
    And,

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    AdjacentSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    GeneralSibling,
}

/// A selector node.
///
/// Namespaces follow [§ 5.3](https://www.w3.org/TR/selectors-4/#type-nmsp):
/// `None` means any namespace (`*|name`), `Some("")` means no namespace
/// (`|name`), anything else is a namespace URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Selector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "represents the qualified name of any element type"
    Universal {
        /// Namespace restriction.
        namespace: Option<String>,
    },

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    Type {
        /// Namespace restriction.
        namespace: Option<String>,
        /// Local type name.
        name: String,
    },

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute {
        /// Namespace restriction. Unprefixed attribute names are in no namespace.
        namespace: Option<String>,
        /// Attribute local name.
        name: String,
        /// How the value is compared.
        matcher: AttributeMatcher,
    },

    /// A pseudo-class, resolved by the model.
    PseudoClass(PseudoClassSelector),

    /// Never matches. Stands in for selectors that failed to parse or that
    /// use an undeclared namespace prefix.
    Nothing,

    /// Two selectors joined by a combinator; `second` is matched against the
    /// subject element.
    Combinator {
        /// The relationship between the operands.
        kind: CombinatorKind,
        /// Left-hand operand.
        first: Box<Selector>,
        /// Right-hand operand.
        second: Box<Selector>,
    },
}

impl Selector {
    /// Join two selectors with a combinator.
    #[must_use]
    pub fn combine(kind: CombinatorKind, first: Self, second: Self) -> Self {
        Self::Combinator {
            kind,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Shorthand for an unqualified type selector.
    #[must_use]
    pub fn type_name(name: impl Into<String>) -> Self {
        Self::Type {
            namespace: None,
            name: name.into(),
        }
    }

    /// Shorthand for a simple pseudo-class.
    #[must_use]
    pub fn pseudo_class(name: impl Into<String>) -> Self {
        Self::PseudoClass(PseudoClassSelector::Simple(name.into()))
    }

    /// Shorthand for an attribute selector in no namespace.
    #[must_use]
    pub fn attribute(name: impl Into<String>, matcher: AttributeMatcher) -> Self {
        Self::Attribute {
            namespace: Some(String::new()),
            name: name.into(),
            matcher,
        }
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// "count the number of ID selectors in the selector (= A)
    ///  count the number of class selectors, attributes selectors, and
    ///  pseudo-classes in the selector (= B)
    ///  count the number of type selectors and pseudo-elements in the selector (= C)
    ///  ignore the universal selector"
    ///
    /// A combinator's specificity is the sum of its operands', so every simple
    /// selector is counted exactly once.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Attribute { .. } | Self::PseudoClass(_) => Specificity(0, 1, 0),
            Self::Type { .. } => Specificity(0, 0, 1),
            Self::Universal { .. } | Self::Nothing => Specificity::default(),
            Self::Combinator { first, second, .. } => first.specificity() + second.specificity(),
        }
    }

    /// Whether this selector or any operand is [`Selector::Nothing`].
    #[must_use]
    pub fn contains_nothing(&self) -> bool {
        match self {
            Self::Nothing => true,
            Self::Combinator { first, second, .. } => {
                first.contains_nothing() || second.contains_nothing()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal { namespace } => {
                write_namespace_prefix(f, namespace.as_deref(), false)?;
                f.write_str("*")
            }
            Self::Type { namespace, name } => {
                write_namespace_prefix(f, namespace.as_deref(), false)?;
                write_ident(f, name)
            }
            Self::Id(id) => {
                f.write_str("#")?;
                write_ident(f, id)
            }
            Self::Class(class) => {
                f.write_str(".")?;
                write_ident(f, class)
            }
            Self::Attribute {
                namespace,
                name,
                matcher,
            } => {
                f.write_str("[")?;
                write_namespace_prefix(f, namespace.as_deref(), true)?;
                write_ident(f, name)?;
                if let (Some(op), Some(value)) = (matcher.operator(), matcher.value()) {
                    f.write_str(op)?;
                    f.write_str(&CSSToken::string(value).to_css())?;
                }
                f.write_str("]")
            }
            Self::PseudoClass(PseudoClassSelector::Simple(name)) => {
                f.write_str(":")?;
                write_ident(f, name)
            }
            Self::PseudoClass(PseudoClassSelector::Function { name, arguments }) => {
                f.write_str(":")?;
                f.write_str(&CSSToken::function(name.as_str()).to_css())?;
                f.write_str(&serialize_tokens(arguments))?;
                f.write_str(")")
            }
            // Matches nothing and cannot be written in CSS.
            Self::Nothing => f.write_str(":not(*)"),
            Self::Combinator {
                kind,
                first,
                second,
            } => {
                let separator = match kind {
                    CombinatorKind::And => "",
                    CombinatorKind::Descendant => " ",
                    CombinatorKind::Child => " > ",
                    CombinatorKind::AdjacentSibling => " + ",
                    CombinatorKind::GeneralSibling => " ~ ",
                };
                write!(f, "{first}{separator}{second}")
            }
        }
    }
}

fn write_ident(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if is_plain_identifier(value) {
        f.write_str(value)
    } else {
        f.write_str(&CSSToken::ident(value).to_css())
    }
}

/// Namespace URIs are written literally; selectors are printed for
/// diagnostics, where the prefix mapping is no longer at hand.
fn write_namespace_prefix(
    f: &mut fmt::Formatter<'_>,
    namespace: Option<&str>,
    is_attribute: bool,
) -> fmt::Result {
    match namespace {
        None if is_attribute => f.write_str("*|"),
        None => Ok(()),
        Some("") if is_attribute => Ok(()),
        Some("") => f.write_str("|"),
        Some(uri) => write!(f, "{}|", CSSToken::string(uri).to_css()),
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// Single-integer projection `a * 10000 + b * 100 + c`, for diagnostics.
    ///
    /// Only order-preserving while B and C stay below 100.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0 as u64 * 10_000 + self.1 as u64 * 100 + self.2 as u64
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A comma-separated list of selectors represents the union of all elements
/// selected by each of the individual selectors in the list."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorGroup {
    /// The alternatives, in source order.
    pub selectors: Vec<Selector>,
}

impl SelectorGroup {
    /// Create a group from its alternatives.
    #[must_use]
    pub const fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// Whether every alternative is [`Selector::Nothing`].
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        self.selectors.iter().all(|s| matches!(s, Selector::Nothing))
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// A successful match: the subject element, the selector node that matched
/// it, and that node's specificity.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'s, T> {
    /// The matched element.
    pub element: T,
    /// The selector node responsible for the match.
    pub selector: &'s Selector,
    /// Specificity of `selector`.
    pub specificity: Specificity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_compound_and_combinators() {
        let selector = Selector::combine(
            CombinatorKind::Child,
            Selector::combine(
                CombinatorKind::And,
                Selector::type_name("layer"),
                Selector::Class("top".into()),
            ),
            Selector::attribute("name", AttributeMatcher::Prefix("foo".into())),
        );
        assert_eq!(selector.to_string(), "layer.top > [name^=\"foo\"]");
    }

    #[test]
    fn test_display_escapes_identifiers() {
        assert_eq!(Selector::Class("2d".into()).to_string(), ".\\32 d");
        assert_eq!(
            Selector::Universal {
                namespace: Some(String::new())
            }
            .to_string(),
            "|*"
        );
    }

    #[test]
    fn test_specificity_projection() {
        assert_eq!(Specificity(1, 2, 3).value(), 10_203);
        assert_eq!(Specificity(0, 0, 0).value(), 0);
    }
}

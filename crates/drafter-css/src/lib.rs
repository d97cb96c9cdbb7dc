//! CSS tokenizer, selector matching, value conversion and cascade for the Drafter style engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types, plus the attribute match operators and `||`
//!   - Source positions (offset, line, column) on every token
//!   - Serialization back to CSS text that re-tokenizes identically
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheets, style rules and at-rules
//!   - Declaration lists for inline styles, `!important`
//!   - `@namespace` ([CSS Namespaces](https://www.w3.org/TR/css-namespaces-3/))
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id, class, attribute and pseudo-class selectors
//!   - Descendant, child, next-sibling and subsequent-sibling combinators
//!   - Matching against any tree through [`SelectorModel`]
//!
//! - **Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Colors, numbers, sizes, keywords, strings, word lists, booleans, transforms
//!   - One [`Converter`] per value type
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - User-agent, user and author origins
//!   - `initial` and `inherit`
//!   - Composite (shorthand) properties

/// Parser configuration.
pub mod config;
/// Error types.
pub mod error;
/// The element-tree contract.
pub mod model;

/// Origin-layered style storage per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Declaration value converters.
pub mod convert;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Typed property values.
pub mod values;

// Re-exports for convenience
pub use cascade::{
    DeclaredValue, Interner, PropertyCache, PropertyKey, PropertyRegistry, StyleMap, StyleOrigin,
    StylesheetsManager, apply_declaration, apply_inline_style,
};
pub use config::ParserConfig;
pub use convert::Converter;
pub use error::{ConversionError, ParseError, StyleError};
pub use model::{PseudoClassStates, QualifiedName, SelectorModel};
pub use parser::{CSSParser, Declaration, Rule, StyleRule, Stylesheet, parse_stylesheet};
pub use selector::{
    MatchResult, NamespaceMap, Selector, SelectorGroup, Specificity, parse_selector_group,
};
pub use tokenizer::{CSSToken, CSSTokenizer, LocatedToken, Position, TokenList, TokenStream};
pub use values::{ColorValue, SizeValue, StyleValue, Transform};

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use super::StyleOrigin;
use super::property::PropertyKey;
use crate::error::ConversionError;
use crate::model::QualifiedName;
use crate::tokenizer::LocatedToken;
use crate::values::StyleValue;

/// Canonicalizes equal values to one shared allocation.
///
/// Values are keyed by their kind and canonical CSS text.
#[derive(Debug, Default)]
pub struct Interner {
    values: DashMap<(&'static str, String), Arc<StyleValue>>,
}

impl Interner {
    /// An empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance equal to `value`.
    pub fn intern(&self, value: StyleValue) -> Arc<StyleValue> {
        let key = (value_kind(&value), value.to_css());
        self.values
            .entry(key)
            .or_insert_with(|| Arc::new(value))
            .clone()
    }

    /// Number of distinct values seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const fn value_kind(value: &StyleValue) -> &'static str {
    match value {
        StyleValue::Color(_) => "color",
        StyleValue::Number(_) => "number",
        StyleValue::Size(_) => "size",
        StyleValue::Keyword(_) => "keyword",
        StyleValue::String(_) => "string",
        StyleValue::WordList(_) => "words",
        StyleValue::Boolean(_) => "boolean",
        StyleValue::Transforms(_) => "transforms",
    }
}

/// [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
///
/// What a declaration asks for, before it is stored.
#[derive(Debug, Clone)]
pub enum DeclaredValue {
    /// "The initial CSS-wide keyword represents the value specified as the
    /// property's initial value." Removes the origin's own value.
    Initial,
    /// "The inherit CSS-wide keyword represents the property's computed value
    /// on the parent element."
    Inherit,
    /// One converted value per leaf key.
    Specified(Vec<(Arc<PropertyKey>, StyleValue)>),
}

impl DeclaredValue {
    /// Classify and convert a declaration value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the value is neither a CSS-wide keyword
    /// nor convertible.
    pub fn parse(key: &Arc<PropertyKey>, tokens: &[LocatedToken]) -> Result<Self, ConversionError> {
        let mut significant = tokens
            .iter()
            .filter(|t| !t.token.is_whitespace() && !t.token.is_eof());
        if let (Some(only), None) = (significant.next(), significant.next()) {
            if only.token.is_ident("initial") {
                return Ok(Self::Initial);
            }
            if only.token.is_ident("inherit") {
                return Ok(Self::Inherit);
            }
        }
        key.convert(tokens).map(Self::Specified)
    }
}

/// The value of one property for each origin.
#[derive(Debug, Clone, Default)]
struct OriginValues([Option<Arc<StyleValue>>; 3]);

impl OriginValues {
    fn highest(&self) -> Option<(StyleOrigin, &Arc<StyleValue>)> {
        StyleOrigin::ALL
            .iter()
            .rev()
            .find_map(|&origin| self.0[origin.index()].as_ref().map(|v| (origin, v)))
    }

    fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// A styled property as seen by a reader, for diagnostics and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledProperty {
    /// The property name.
    pub name: String,
    /// The styled value as CSS text.
    pub value: String,
    /// The origin the value comes from; `None` for the initial value.
    pub origin: Option<StyleOrigin>,
}

/// The origin-layered property values of one element.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    values: HashMap<QualifiedName, OriginValues>,
}

impl StyleMap {
    /// An element without any styled value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value `origin` holds for `key`.
    #[must_use]
    pub fn get(&self, key: &PropertyKey, origin: StyleOrigin) -> Option<&Arc<StyleValue>> {
        self.values.get(key.name())?.0[origin.index()].as_ref()
    }

    /// Store `value` for `key` at `origin`. Returns whether the stored value
    /// changed.
    pub fn set(&mut self, key: &PropertyKey, origin: StyleOrigin, value: Arc<StyleValue>) -> bool {
        let slot = &mut self.values.entry(key.name().clone()).or_default().0[origin.index()];
        let changed = slot.as_ref().is_none_or(|old| old != &value);
        *slot = Some(value);
        changed
    }

    /// Drop the value `origin` holds for `key`. Returns whether there was one.
    pub fn remove(&mut self, key: &PropertyKey, origin: StyleOrigin) -> bool {
        let Some(values) = self.values.get_mut(key.name()) else {
            return false;
        };
        let removed = values.0[origin.index()].take().is_some();
        if values.is_empty() {
            let _ = self.values.remove(key.name());
        }
        removed
    }

    /// Drop every value held at `origin`.
    pub fn clear_origin(&mut self, origin: StyleOrigin) {
        for values in self.values.values_mut() {
            values.0[origin.index()] = None;
        }
        self.values.retain(|_, values| !values.is_empty());
    }

    /// The origin whose value wins for `key`, if any origin has one.
    #[must_use]
    pub fn winning_origin(&self, key: &PropertyKey) -> Option<StyleOrigin> {
        self.values.get(key.name())?.highest().map(|(origin, _)| origin)
    }

    /// [§ 6.1 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// The value of the highest origin, else the key's initial value. `None`
    /// only for composite keys.
    #[must_use]
    pub fn styled(&self, key: &PropertyKey) -> Option<Arc<StyleValue>> {
        self.values
            .get(key.name())
            .and_then(OriginValues::highest)
            .map(|(_, value)| Arc::clone(value))
            .or_else(|| key.initial().cloned())
    }

    /// The styled value as text attribute selectors compare against.
    /// Composite keys join their components' text with spaces.
    #[must_use]
    pub fn styled_text(&self, key: &PropertyKey) -> String {
        if key.is_composite() {
            key.components()
                .iter()
                .map(|component| self.styled_text(component))
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            self.styled(key)
                .map(|value| value.to_attribute_text())
                .unwrap_or_default()
        }
    }

    /// Snapshot of `keys` for display.
    #[must_use]
    pub fn snapshot(&self, keys: &[Arc<PropertyKey>]) -> Vec<StyledProperty> {
        keys.iter()
            .filter(|key| !key.is_composite())
            .map(|key| StyledProperty {
                name: key.name().to_string(),
                value: self.styled(key).map(|v| v.to_css()).unwrap_or_default(),
                origin: self.winning_origin(key),
            })
            .collect()
    }

    /// Store a declared value for `key` at `origin`.
    ///
    /// `inherit` copies the styled values of `parent`, or the initial values
    /// when there is no parent. Returns whether any stored value changed.
    pub fn apply(
        &mut self,
        key: &Arc<PropertyKey>,
        origin: StyleOrigin,
        declared: DeclaredValue,
        parent: Option<&Self>,
        interner: &Interner,
    ) -> bool {
        let mut changed = false;
        match declared {
            DeclaredValue::Initial => {
                for leaf in key.leaves() {
                    changed |= self.remove(&leaf, origin);
                }
            }
            DeclaredValue::Inherit => {
                for leaf in key.leaves() {
                    let inherited = match parent {
                        Some(parent) => parent.styled(&leaf),
                        None => leaf.initial().cloned(),
                    };
                    if let Some(value) = inherited {
                        changed |= self.set(&leaf, origin, value);
                    }
                }
            }
            DeclaredValue::Specified(values) => {
                for (leaf, value) in values {
                    changed |= self.set(&leaf, origin, interner.intern(value));
                }
            }
        }
        changed
    }

    /// Whether no origin holds any value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convert `tokens` for `key` and store the result at `origin`.
///
/// Returns whether any stored value changed.
///
/// # Errors
///
/// Returns [`ConversionError`] if the tokens do not convert; nothing is
/// stored then.
pub fn apply_declaration(
    map: &mut StyleMap,
    key: &Arc<PropertyKey>,
    origin: StyleOrigin,
    tokens: &[LocatedToken],
    parent: Option<&StyleMap>,
    interner: &Interner,
) -> Result<bool, ConversionError> {
    let declared = DeclaredValue::parse(key, tokens)?;
    Ok(map.apply(key, origin, declared, parent, interner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::NumberConverter;
    use crate::tokenizer::tokenize;

    fn width() -> Arc<PropertyKey> {
        Arc::new(PropertyKey::simple(
            QualifiedName::local("width"),
            Arc::new(NumberConverter::new()),
            StyleValue::Number(1.0),
        ))
    }

    fn apply(map: &mut StyleMap, key: &Arc<PropertyKey>, origin: StyleOrigin, text: &str) -> bool {
        apply_declaration(map, key, origin, &tokenize(text), None, &Interner::new()).unwrap()
    }

    #[test]
    fn test_highest_origin_wins() {
        let key = width();
        let mut map = StyleMap::new();
        assert!(apply(&mut map, &key, StyleOrigin::UserAgent, "2"));
        assert!(apply(&mut map, &key, StyleOrigin::User, "3"));
        assert_eq!(map.styled(&key).as_deref(), Some(&StyleValue::Number(3.0)));
        assert_eq!(map.winning_origin(&key), Some(StyleOrigin::User));
    }

    #[test]
    fn test_unchanged_write_reports_false() {
        let key = width();
        let mut map = StyleMap::new();
        assert!(apply(&mut map, &key, StyleOrigin::Author, "2"));
        assert!(!apply(&mut map, &key, StyleOrigin::Author, " 2 "));
    }

    #[test]
    fn test_initial_without_value_changes_nothing() {
        let key = width();
        let mut map = StyleMap::new();
        assert!(!apply(&mut map, &key, StyleOrigin::Author, "initial"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_interner_shares_equal_values() {
        let interner = Interner::new();
        let a = interner.intern(StyleValue::Number(2.0));
        let b = interner.intern(StyleValue::Number(2.0));
        let c = interner.intern(StyleValue::Keyword("2".to_owned()));
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_clear_origin() {
        let key = width();
        let mut map = StyleMap::new();
        let _ = apply(&mut map, &key, StyleOrigin::User, "5");
        let _ = apply(&mut map, &key, StyleOrigin::Author, "6");
        map.clear_origin(StyleOrigin::Author);
        assert_eq!(map.styled(&key).as_deref(), Some(&StyleValue::Number(5.0)));
        map.clear_origin(StyleOrigin::User);
        assert!(map.is_empty());
    }
}

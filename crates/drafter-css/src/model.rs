//! The contract between the selector/cascade engine and an element tree.
//!
//! The engine never sees a concrete tree. Everything it needs to know about
//! an element, and the single way it writes styles back, goes through
//! [`SelectorModel`]. Queries are total: "does not apply" is `false` or `None`.

use core::fmt;
use core::hash::Hash;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::cascade::StyleOrigin;
use crate::error::StyleError;
use crate::tokenizer::{CSSToken, LocatedToken};

/// A namespace-qualified attribute or property name.
///
/// An empty namespace means "no namespace".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    /// Namespace URI, or empty.
    pub namespace: String,
    /// Local name.
    pub name: String,
}

impl QualifiedName {
    /// A name in no namespace.
    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            name: name.into(),
        }
    }

    /// A name in the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Whether this name is selected by `namespace` (`None` = any) and `name`.
    #[must_use]
    pub fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        self.name == name && namespace.is_none_or(|ns| ns == self.namespace)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}|{}", self.namespace, self.name)
        }
    }
}

/// Transient pseudo-class state (`:hover`, `:focus`, ...) kept outside the
/// elements themselves.
///
/// Names are ASCII case-insensitive and stored lowercased.
#[derive(Debug, Clone)]
pub struct PseudoClassStates<T> {
    states: HashMap<String, HashSet<T>>,
}

impl<T> Default for PseudoClassStates<T> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash> PseudoClassStates<T> {
    /// No element is in any state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `element` into the `name` state. Returns whether it was newly added.
    pub fn insert(&mut self, name: &str, element: T) -> bool {
        self.states
            .entry(name.to_ascii_lowercase())
            .or_default()
            .insert(element)
    }

    /// Take `element` out of the `name` state. Returns whether it was present.
    pub fn remove(&mut self, name: &str, element: &T) -> bool {
        let key = name.to_ascii_lowercase();
        let Some(elements) = self.states.get_mut(&key) else {
            return false;
        };
        let removed = elements.remove(element);
        if elements.is_empty() {
            let _ = self.states.remove(&key);
        }
        removed
    }

    /// Whether `element` is in the `name` state.
    #[must_use]
    pub fn contains(&self, name: &str, element: &T) -> bool {
        self.states
            .get(&name.to_ascii_lowercase())
            .is_some_and(|elements| elements.contains(element))
    }

    /// Remove every element from the `name` state.
    pub fn clear(&mut self, name: &str) {
        let _ = self.states.remove(&name.to_ascii_lowercase());
    }

    /// Whether no state holds any element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Everything the engine needs from an element tree whose elements are
/// identified by handles of type `T`.
///
/// Attribute queries take a namespace restriction: `None` means any
/// namespace, `Some("")` means no namespace.
pub trait SelectorModel<T: Eq + Hash> {
    /// The element's id, if it has one.
    fn id(&self, element: &T) -> Option<&str>;

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    fn has_id(&self, element: &T, id: &str) -> bool {
        self.id(element) == Some(id)
    }

    /// The element's local type name.
    fn type_name(&self, element: &T) -> Option<&str>;

    /// The namespace of the element's type; empty for none.
    fn type_namespace(&self, _element: &T) -> &str {
        ""
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    fn has_type(&self, element: &T, namespace: Option<&str>, name: &str) -> bool {
        self.type_name(element) == Some(name)
            && namespace.is_none_or(|ns| ns == self.type_namespace(element))
    }

    /// The element's style classes.
    fn style_classes(&self, element: &T) -> Vec<&str>;

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    fn has_style_class(&self, element: &T, class: &str) -> bool {
        self.style_classes(element).contains(&class)
    }

    /// The attribute's value as CSS text, or `None` if the element has no such
    /// attribute.
    fn attribute_value(&self, element: &T, namespace: Option<&str>, name: &str) -> Option<String>;

    /// `[att]`
    fn has_attribute(&self, element: &T, namespace: Option<&str>, name: &str) -> bool {
        self.attribute_value(element, namespace, name).is_some()
    }

    /// `[att=val]`
    fn attribute_value_equals(
        &self,
        element: &T,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> bool {
        self.attribute_value(element, namespace, name)
            .is_some_and(|v| v == value)
    }

    /// `[att^=val]`: "If 'val' is the empty string then the selector does not
    /// represent anything."
    fn attribute_value_starts_with(
        &self,
        element: &T,
        namespace: Option<&str>,
        name: &str,
        prefix: &str,
    ) -> bool {
        !prefix.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|v| v.starts_with(prefix))
    }

    /// `[att$=val]`
    fn attribute_value_ends_with(
        &self,
        element: &T,
        namespace: Option<&str>,
        name: &str,
        suffix: &str,
    ) -> bool {
        !suffix.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|v| v.ends_with(suffix))
    }

    /// `[att*=val]`
    fn attribute_value_contains(
        &self,
        element: &T,
        namespace: Option<&str>,
        name: &str,
        substring: &str,
    ) -> bool {
        !substring.is_empty()
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|v| v.contains(substring))
    }

    /// `[att~=val]`: "If 'val' contains whitespace, it will never represent
    /// anything (since the words are separated by spaces). Also if 'val' is the
    /// empty string, it will never represent anything."
    fn attribute_value_contains_word(
        &self,
        element: &T,
        namespace: Option<&str>,
        name: &str,
        word: &str,
    ) -> bool {
        !word.is_empty()
            && !word.contains(char::is_whitespace)
            && self
                .attribute_value(element, namespace, name)
                .is_some_and(|v| v.split_whitespace().any(|w| w == word))
    }

    /// Pseudo-classes the element has by itself, independent of any side table.
    fn has_intrinsic_pseudo_class(&self, _element: &T, _name: &str) -> bool {
        false
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Consults `states` first, then the element's intrinsic pseudo-classes.
    fn has_pseudo_class(&self, element: &T, name: &str, states: &PseudoClassStates<T>) -> bool {
        states.contains(name, element) || self.has_intrinsic_pseudo_class(element, name)
    }

    /// Functional pseudo-classes such as `:lang(en)`. None are known by default.
    fn has_function_pseudo_class(
        &self,
        _element: &T,
        _name: &str,
        _arguments: &[CSSToken],
        _states: &PseudoClassStates<T>,
    ) -> bool {
        false
    }

    /// The element's parent, `None` at the root.
    fn parent(&self, element: &T) -> Option<T>;

    /// The element's previous sibling, `None` for the first child.
    fn previous_sibling(&self, element: &T) -> Option<T>;

    /// Every attribute name readable through [`Self::attribute_value`].
    fn attribute_names(&self, element: &T) -> Vec<QualifiedName>;

    /// Names of attributes that are composed of other attributes
    /// (shorthands such as `translate`).
    fn composed_attribute_names(&self, _element: &T) -> Vec<QualifiedName> {
        Vec::new()
    }

    /// Names of attributes that are not composed of others.
    fn decomposed_attribute_names(&self, element: &T) -> Vec<QualifiedName> {
        let composed = self.composed_attribute_names(element);
        self.attribute_names(element)
            .into_iter()
            .filter(|name| !composed.contains(name))
            .collect()
    }

    /// Convert `tokens` and store the result on `element` at `origin`.
    ///
    /// Returns whether the element's stored value changed.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Conversion`] if the property is unknown or the
    /// tokens do not convert to its type.
    fn set_attribute(
        &mut self,
        element: &T,
        origin: StyleOrigin,
        namespace: Option<&str>,
        name: &str,
        tokens: &[LocatedToken],
    ) -> Result<bool, StyleError>;

    /// Drop every value that stylesheets assigned to `element` so they can be
    /// applied afresh. Values at [`StyleOrigin::User`] are kept.
    fn reset(&mut self, element: &T);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_case_insensitive() {
        let mut states = PseudoClassStates::new();
        assert!(states.insert("Hover", 1));
        assert!(!states.insert("hover", 1));
        assert!(states.contains("HOVER", &1));
        assert!(!states.contains("hover", &2));
        assert!(states.remove("hover", &1));
        assert!(states.is_empty());
    }

    #[test]
    fn test_qualified_name_matching() {
        let name = QualifiedName::new("urn:x", "fill");
        assert!(name.matches(None, "fill"));
        assert!(name.matches(Some("urn:x"), "fill"));
        assert!(!name.matches(Some(""), "fill"));
        assert_eq!(name.to_string(), "urn:x|fill");
        assert_eq!(QualifiedName::local("fill").to_string(), "fill");
    }
}

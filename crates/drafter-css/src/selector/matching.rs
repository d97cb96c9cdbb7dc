use core::hash::Hash;
use core::iter::successors;

use super::{AttributeMatcher, CombinatorKind, MatchResult, PseudoClassSelector, Selector, SelectorGroup};
use crate::model::{PseudoClassStates, SelectorModel};

impl Selector {
    /// [§ 3.1 Match a selector against an element](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Returns the match with this node's specificity, or `None` when the
    /// selector does not match `element`.
    pub fn match_element<'s, T, M>(
        &'s self,
        model: &M,
        element: &T,
        states: &PseudoClassStates<T>,
    ) -> Option<MatchResult<'s, T>>
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        let specificity = match self {
            Self::Combinator {
                kind,
                first,
                second,
            } => {
                // The right-hand operand always describes the subject.
                let subject = second.match_element(model, element, states)?;
                let related = match kind {
                    CombinatorKind::And => first.match_element(model, element, states),

                    // "an arbitrary descendant of some ancestor element A"
                    CombinatorKind::Descendant => successors(model.parent(element), |e| model.parent(e))
                        .find_map(|ancestor| first.match_element(model, &ancestor, states)),

                    // "a direct child of element A"
                    CombinatorKind::Child => model
                        .parent(element)
                        .and_then(|parent| first.match_element(model, &parent, states)),

                    // "immediately follows element A"
                    CombinatorKind::AdjacentSibling => model
                        .previous_sibling(element)
                        .and_then(|sibling| first.match_element(model, &sibling, states)),

                    // "follows element A (not necessarily immediately)"
                    CombinatorKind::GeneralSibling => {
                        successors(model.previous_sibling(element), |e| model.previous_sibling(e))
                            .find_map(|sibling| first.match_element(model, &sibling, states))
                    }
                }?;
                subject.specificity + related.specificity
            }
            simple => {
                if !simple.matches_simple(model, element, states) {
                    return None;
                }
                simple.specificity()
            }
        };

        Some(MatchResult {
            element: element.clone(),
            selector: self,
            specificity,
        })
    }

    /// Whether the selector matches `element`.
    pub fn matches<T, M>(&self, model: &M, element: &T, states: &PseudoClassStates<T>) -> bool
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        self.match_element(model, element, states).is_some()
    }

    /// Evaluate a simple selector. Combinators are handled by the caller.
    fn matches_simple<T, M>(&self, model: &M, element: &T, states: &PseudoClassStates<T>) -> bool
    where
        T: Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        match self {
            // "represents the qualified name of any element type"
            Self::Universal { namespace } => namespace
                .as_deref()
                .is_none_or(|ns| ns == model.type_namespace(element)),
            Self::Type { namespace, name } => model.has_type(element, namespace.as_deref(), name),
            Self::Id(id) => model.has_id(element, id),
            Self::Class(class) => model.has_style_class(element, class),
            Self::Attribute {
                namespace,
                name,
                matcher,
            } => {
                let ns = namespace.as_deref();
                match matcher {
                    AttributeMatcher::Exists => model.has_attribute(element, ns, name),
                    AttributeMatcher::Equals(v) => model.attribute_value_equals(element, ns, name, v),
                    AttributeMatcher::Includes(v) => {
                        model.attribute_value_contains_word(element, ns, name, v)
                    }
                    // "either being exactly 'val' or beginning with 'val' immediately
                    // followed by '-'"
                    AttributeMatcher::DashMatch(v) => {
                        model.attribute_value_equals(element, ns, name, v)
                            || model.attribute_value_starts_with(element, ns, name, &format!("{v}-"))
                    }
                    AttributeMatcher::Prefix(v) => {
                        model.attribute_value_starts_with(element, ns, name, v)
                    }
                    AttributeMatcher::Suffix(v) => model.attribute_value_ends_with(element, ns, name, v),
                    AttributeMatcher::Substring(v) => {
                        model.attribute_value_contains(element, ns, name, v)
                    }
                }
            }
            Self::PseudoClass(PseudoClassSelector::Simple(name)) => {
                model.has_pseudo_class(element, name, states)
            }
            Self::PseudoClass(PseudoClassSelector::Function { name, arguments }) => {
                model.has_function_pseudo_class(element, name, arguments, states)
            }
            Self::Nothing | Self::Combinator { .. } => false,
        }
    }
}

impl SelectorGroup {
    /// Match every alternative and keep the most specific match. When several
    /// alternatives tie, the first in source order wins.
    pub fn match_element<'s, T, M>(
        &'s self,
        model: &M,
        element: &T,
        states: &PseudoClassStates<T>,
    ) -> Option<MatchResult<'s, T>>
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        let mut best: Option<MatchResult<'s, T>> = None;
        for selector in &self.selectors {
            if let Some(result) = selector.match_element(model, element, states)
                && best.as_ref().is_none_or(|b| result.specificity > b.specificity)
            {
                best = Some(result);
            }
        }
        best
    }

    /// Whether any alternative matches `element`.
    pub fn matches<T, M>(&self, model: &M, element: &T, states: &PseudoClassStates<T>) -> bool
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        self.selectors
            .iter()
            .any(|s| s.match_element(model, element, states).is_some())
    }
}

use core::cmp::Ordering;
use core::hash::Hash;

use drafter_common::warning::warn_once;

use super::StyleOrigin;
use crate::config::ParserConfig;
use crate::error::StyleError;
use crate::model::{PseudoClassStates, SelectorModel};
use crate::parser::{Declaration, Stylesheet, parse_declaration_list, parse_stylesheet};
use crate::selector::Specificity;

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// A declaration from a rule that matched an element, with everything the
/// cascade sorts by.
#[derive(Debug, Clone, Copy)]
pub struct MatchedDeclaration<'a> {
    /// Origin of the stylesheet.
    pub origin: StyleOrigin,
    /// Whether the declaration is `!important`.
    pub important: bool,
    /// Specificity of the most specific matching selector of the rule.
    pub specificity: Specificity,
    /// Stylesheet, rule and declaration index.
    pub order: (usize, usize, usize),
    /// The declaration itself.
    pub declaration: &'a Declaration,
}

impl MatchedDeclaration<'_> {
    /// "Declarations are sorted by origin, importance, specificity and order
    /// of appearance"; greater sorts later and wins.
    fn cascade_cmp(&self, other: &Self) -> Ordering {
        (self.origin, self.important, self.specificity, self.order).cmp(&(
            other.origin,
            other.important,
            other.specificity,
            other.order,
        ))
    }
}

/// The stylesheets of a drawing, by origin.
///
/// Applying them to an element writes every matching declaration through
/// [`SelectorModel::set_attribute`] in cascade order, so the last write per
/// origin is the winning value.
#[derive(Debug, Clone, Default)]
pub struct StylesheetsManager {
    stylesheets: Vec<Stylesheet>,
}

impl StylesheetsManager {
    /// A manager without stylesheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed stylesheet. Its recorded parse errors are logged once.
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        for error in &stylesheet.errors {
            let source = stylesheet.source.as_deref().unwrap_or("<inline>");
            warn_once("drafter-css", &format!("{source}:{error}"));
        }
        self.stylesheets.push(stylesheet);
    }

    /// Parse `text` with `config` and add it. Returns the parsed stylesheet.
    pub fn add_css(&mut self, text: &str, config: ParserConfig) -> &Stylesheet {
        self.add_stylesheet(parse_stylesheet(text, config));
        let index = self.stylesheets.len() - 1;
        &self.stylesheets[index]
    }

    /// Remove every stylesheet of `origin`.
    pub fn clear(&mut self, origin: StyleOrigin) {
        self.stylesheets.retain(|sheet| sheet.origin != origin);
    }

    /// The stylesheets in insertion order.
    #[must_use]
    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// Every declaration whose rule matches `element`, in ascending cascade
    /// order.
    pub fn matching_declarations<T, M>(
        &self,
        model: &M,
        element: &T,
        states: &PseudoClassStates<T>,
    ) -> Vec<MatchedDeclaration<'_>>
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        let mut matched = Vec::new();
        for (sheet_index, sheet) in self.stylesheets.iter().enumerate() {
            for (rule_index, rule) in sheet.style_rules().enumerate() {
                let Some(result) = rule.selectors.match_element(model, element, states) else {
                    continue;
                };
                for (decl_index, declaration) in rule.declarations.iter().enumerate() {
                    matched.push(MatchedDeclaration {
                        origin: sheet.origin,
                        important: declaration.important,
                        specificity: result.specificity,
                        order: (sheet_index, rule_index, decl_index),
                        declaration,
                    });
                }
            }
        }
        matched.sort_by(MatchedDeclaration::cascade_cmp);
        matched
    }

    /// Apply every matching declaration to `element`.
    ///
    /// A declaration that fails is logged and skipped; the rest of its rule
    /// still applies. Returns the failures.
    pub fn apply_stylesheets<T, M>(
        &self,
        model: &mut M,
        element: &T,
        states: &PseudoClassStates<T>,
    ) -> Vec<StyleError>
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        let matched = self.matching_declarations(model, element, states);
        log::trace!("apply_stylesheets: {} matching declarations", matched.len());

        let mut errors = Vec::new();
        for m in matched {
            let declaration = m.declaration;
            if let Err(error) = model.set_attribute(
                element,
                m.origin,
                declaration.namespace.as_deref(),
                &declaration.name,
                &declaration.value,
            ) {
                warn_once("drafter-css", &format!("skipped declaration: {error}"));
                errors.push(error);
            }
        }
        errors
    }

    /// Reset and restyle `elements`, which must list parents before their
    /// children so that `inherit` sees styled parents.
    pub fn apply_to_tree<T, M>(
        &self,
        model: &mut M,
        elements: impl IntoIterator<Item = T>,
        states: &PseudoClassStates<T>,
    ) -> Vec<StyleError>
    where
        T: Clone + Eq + Hash,
        M: SelectorModel<T> + ?Sized,
    {
        let mut errors = Vec::new();
        for element in elements {
            model.reset(&element);
            errors.extend(self.apply_stylesheets(model, &element, states));
        }
        errors
    }
}

/// [CSS Style Attributes § 3](https://www.w3.org/TR/css-style-attr/#interpret)
///
/// Apply a `style` attribute's declaration list to `element` at author origin.
/// Call after the stylesheets so that the inline declarations win.
///
/// Returns parse and conversion failures; valid declarations apply either way.
pub fn apply_inline_style<T, M>(model: &mut M, element: &T, text: &str) -> Vec<StyleError>
where
    T: Eq + Hash,
    M: SelectorModel<T> + ?Sized,
{
    let (mut declarations, parse_errors) = parse_declaration_list(text);
    let mut errors: Vec<StyleError> = parse_errors.into_iter().map(StyleError::from).collect();

    // "!important" inline declarations go last.
    declarations.sort_by_key(|d| d.important);

    for declaration in &declarations {
        if let Err(error) = model.set_attribute(
            element,
            StyleOrigin::Author,
            declaration.namespace.as_deref(),
            &declaration.name,
            &declaration.value,
        ) {
            warn_once("drafter-css", &format!("skipped inline declaration: {error}"));
            errors.push(error);
        }
    }
    errors
}

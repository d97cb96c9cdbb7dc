//! [`SelectorModel`] for figure trees.

use std::sync::Arc;

use drafter_css::cascade::StyledProperty;
use drafter_css::error::ConversionError;
use drafter_css::tokenizer::tokenize;
use drafter_css::{
    Interner, LocatedToken, PropertyCache, PropertyKey, PropertyRegistry, PseudoClassStates,
    QualifiedName, SelectorModel, StyleError, StyleOrigin, StyleValue, StylesheetsManager,
    apply_declaration, apply_inline_style,
};

use crate::properties::registry_for;
use crate::tree::{FigureId, FigureKind, FigureTree};

/// A figure tree together with the caches styling it needs.
///
/// Property keys are looked up per [`FigureKind`] through a shared
/// [`PropertyCache`]; converted values are interned.
#[derive(Debug, Default)]
pub struct FigureSelectorModel {
    /// The styled figures.
    pub tree: FigureTree,
    cache: PropertyCache<FigureKind>,
    interner: Interner,
}

impl FigureSelectorModel {
    /// Style `tree`.
    #[must_use]
    pub fn new(tree: FigureTree) -> Self {
        Self {
            tree,
            cache: PropertyCache::new(),
            interner: Interner::new(),
        }
    }

    /// The property registry of `kind`.
    #[must_use]
    pub fn registry(&self, kind: FigureKind) -> Arc<PropertyRegistry> {
        self.cache.registry(&kind, || registry_for(kind))
    }

    /// The property key `name` of `figure`, if its kind has one.
    #[must_use]
    pub fn property(&self, figure: FigureId, namespace: Option<&str>, name: &str) -> Option<Arc<PropertyKey>> {
        let kind = self.tree.get(figure)?.kind;
        self.cache.lookup(&kind, namespace, name, || registry_for(kind))
    }

    /// The styled value of property `name` on `figure`.
    #[must_use]
    pub fn styled(&self, figure: FigureId, name: &str) -> Option<Arc<StyleValue>> {
        let key = self.property(figure, None, name)?;
        self.tree.get(figure)?.styles.styled(&key)
    }

    /// Every simple property of `figure` with its styled value and origin.
    #[must_use]
    pub fn snapshot(&self, figure: FigureId) -> Vec<StyledProperty> {
        let Some(node) = self.tree.get(figure) else {
            return Vec::new();
        };
        node.styles.snapshot(self.registry(node.kind).keys())
    }

    /// Restyle the whole tree: reset, apply the stylesheets, then the
    /// figure's inline style, parents before children.
    ///
    /// Returns every declaration that failed.
    pub fn style_tree(
        &mut self,
        manager: &StylesheetsManager,
        states: &PseudoClassStates<FigureId>,
    ) -> Vec<StyleError> {
        let order = self.tree.preorder(self.tree.root());
        log::debug!("styling {} figures", order.len());
        let mut errors = Vec::new();
        for figure in order {
            self.reset(&figure);
            errors.extend(manager.apply_stylesheets(self, &figure, states));
            let inline = self.tree.get(figure).and_then(|f| f.style.clone());
            if let Some(text) = inline {
                errors.extend(apply_inline_style(self, &figure, &text));
            }
        }
        errors
    }

    /// Apply one declaration outside of any stylesheet, typically at
    /// [`StyleOrigin::User`] for values set by the user of a drawing editor.
    ///
    /// # Errors
    ///
    /// See [`SelectorModel::set_attribute`].
    pub fn set_property(
        &mut self,
        figure: FigureId,
        origin: StyleOrigin,
        name: &str,
        value: &str,
    ) -> Result<bool, StyleError> {
        let tokens = tokenize(value);
        self.set_attribute(&figure, origin, None, name, &tokens)
    }
}

impl SelectorModel<FigureId> for FigureSelectorModel {
    fn id(&self, element: &FigureId) -> Option<&str> {
        self.tree.get(*element)?.id.as_deref()
    }

    fn type_name(&self, element: &FigureId) -> Option<&str> {
        self.tree.get(*element).map(|f| f.kind.name())
    }

    fn style_classes(&self, element: &FigureId) -> Vec<&str> {
        self.tree
            .get(*element)
            .map(|f| f.style_classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn attribute_value(&self, element: &FigureId, namespace: Option<&str>, name: &str) -> Option<String> {
        let key = self.property(*element, namespace, name)?;
        Some(self.tree.get(*element)?.styles.styled_text(&key))
    }

    /// `root`, `first-child`, `last-child` and `empty` follow from the tree;
    /// anything else must have been given to the figure.
    fn has_intrinsic_pseudo_class(&self, element: &FigureId, name: &str) -> bool {
        let Some(figure) = self.tree.get(*element) else {
            return false;
        };
        match name.to_ascii_lowercase().as_str() {
            "root" => *element == self.tree.root(),
            "first-child" => figure.parent.is_some() && figure.prev_sibling.is_none(),
            "last-child" => figure.parent.is_some() && figure.next_sibling.is_none(),
            "empty" => figure.children.is_empty(),
            other => figure.pseudo_classes.contains(other),
        }
    }

    fn parent(&self, element: &FigureId) -> Option<FigureId> {
        self.tree.parent(*element)
    }

    fn previous_sibling(&self, element: &FigureId) -> Option<FigureId> {
        self.tree.prev_sibling(*element)
    }

    fn attribute_names(&self, element: &FigureId) -> Vec<QualifiedName> {
        self.tree
            .get(*element)
            .map(|f| self.registry(f.kind).names())
            .unwrap_or_default()
    }

    fn composed_attribute_names(&self, element: &FigureId) -> Vec<QualifiedName> {
        self.tree
            .get(*element)
            .map(|f| self.registry(f.kind).composite_names())
            .unwrap_or_default()
    }

    fn set_attribute(
        &mut self,
        element: &FigureId,
        origin: StyleOrigin,
        namespace: Option<&str>,
        name: &str,
        tokens: &[LocatedToken],
    ) -> Result<bool, StyleError> {
        let property = namespace.map_or_else(|| name.to_owned(), |ns| format!("{ns}|{name}"));
        let Some(key) = self.property(*element, namespace, name) else {
            return Err(StyleError::Conversion {
                source: ConversionError::UnknownProperty {
                    name: property.clone(),
                    position: tokens.first().map(|t| t.position).unwrap_or_default(),
                },
                property,
            });
        };
        let Some((styles, parent)) = self.tree.styles_with_parent(*element) else {
            return Ok(false);
        };
        apply_declaration(styles, &key, origin, tokens, parent, &self.interner)
            .map_err(|source| StyleError::Conversion { property, source })
    }

    fn reset(&mut self, element: &FigureId) {
        if let Some(figure) = self.tree.get_mut(*element) {
            figure.styles.clear_origin(StyleOrigin::UserAgent);
            figure.styles.clear_origin(StyleOrigin::Author);
        }
    }
}

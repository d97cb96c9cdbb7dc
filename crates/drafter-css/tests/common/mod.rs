//! A small element tree for exercising the engine without a real adapter.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use drafter_css::convert::{ColorConverter, NumberConverter, StringConverter};
use drafter_css::error::ConversionError;
use drafter_css::{
    ColorValue, Interner, LocatedToken, PropertyKey, PropertyRegistry, QualifiedName,
    SelectorModel, StyleError, StyleMap, StyleOrigin, StyleValue, apply_declaration,
};

/// One element of a [`TestTree`].
#[derive(Debug, Default)]
pub struct Element {
    pub tag: String,
    pub namespace: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(QualifiedName, String)>,
    pub pseudo_classes: Vec<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Elements addressed by index, with `fill`, `width` and `label` properties.
#[derive(Debug)]
pub struct TestTree {
    pub elements: Vec<Element>,
    pub styles: Vec<StyleMap>,
    registry: PropertyRegistry,
    interner: Interner,
}

impl TestTree {
    /// A tree holding only the root element `tag`.
    pub fn new(tag: &str) -> Self {
        let mut registry = PropertyRegistry::new();
        let _ = registry.register(PropertyKey::simple(
            QualifiedName::local("fill"),
            Arc::new(ColorConverter),
            StyleValue::Color(ColorValue::BLACK),
        ));
        let _ = registry.register(
            PropertyKey::simple(
                QualifiedName::local("width"),
                Arc::new(NumberConverter::new()),
                StyleValue::Number(1.0),
            )
            .inherited(),
        );
        let _ = registry.register(PropertyKey::simple(
            QualifiedName::new("urn:test", "label"),
            Arc::new(StringConverter),
            StyleValue::String(String::new()),
        ));
        let mut tree = Self {
            elements: Vec::new(),
            styles: Vec::new(),
            registry,
            interner: Interner::new(),
        };
        let _ = tree.push(None, tag);
        tree
    }

    fn push(&mut self, parent: Option<usize>, tag: &str) -> usize {
        let index = self.elements.len();
        self.elements.push(Element {
            tag: tag.to_owned(),
            parent,
            ..Element::default()
        });
        self.styles.push(StyleMap::new());
        if let Some(parent) = parent {
            self.elements[parent].children.push(index);
        }
        index
    }

    /// Append a `tag` element to `parent`.
    pub fn add(&mut self, parent: usize, tag: &str) -> usize {
        self.push(Some(parent), tag)
    }

    /// Append an element with an id and classes.
    pub fn add_with(&mut self, parent: usize, tag: &str, id: Option<&str>, classes: &[&str]) -> usize {
        let index = self.add(parent, tag);
        self.elements[index].id = id.map(str::to_owned);
        self.elements[index].classes = classes.iter().map(|c| (*c).to_owned()).collect();
        index
    }

    /// Give `element` a plain attribute.
    pub fn set_plain_attribute(&mut self, element: usize, namespace: &str, name: &str, value: &str) {
        self.elements[element]
            .attributes
            .push((QualifiedName::new(namespace, name), value.to_owned()));
    }

    /// All element indices, parents first.
    pub fn all(&self) -> Vec<usize> {
        (0..self.elements.len()).collect()
    }

    /// The styled value of `name` on `element`.
    pub fn styled(&self, element: usize, name: &str) -> Option<StyleValue> {
        let key = self.registry.find(None, name)?;
        self.styles[element].styled(&key).map(|v| StyleValue::clone(&v))
    }

    /// The origin whose value of `name` wins on `element`.
    pub fn origin(&self, element: usize, name: &str) -> Option<StyleOrigin> {
        let key = self.registry.find(None, name)?;
        self.styles[element].winning_origin(&key)
    }
}

impl SelectorModel<usize> for TestTree {
    fn id(&self, element: &usize) -> Option<&str> {
        self.elements.get(*element)?.id.as_deref()
    }

    fn type_name(&self, element: &usize) -> Option<&str> {
        self.elements.get(*element).map(|e| e.tag.as_str())
    }

    fn type_namespace(&self, element: &usize) -> &str {
        self.elements.get(*element).map_or("", |e| e.namespace.as_str())
    }

    fn style_classes(&self, element: &usize) -> Vec<&str> {
        self.elements
            .get(*element)
            .map(|e| e.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn attribute_value(&self, element: &usize, namespace: Option<&str>, name: &str) -> Option<String> {
        let node = self.elements.get(*element)?;
        if let Some((_, value)) = node.attributes.iter().find(|(n, _)| n.matches(namespace, name)) {
            return Some(value.clone());
        }
        let key = self.registry.find(namespace, name)?;
        Some(self.styles[*element].styled_text(&key))
    }

    fn has_intrinsic_pseudo_class(&self, element: &usize, name: &str) -> bool {
        self.elements
            .get(*element)
            .is_some_and(|e| e.pseudo_classes.iter().any(|p| p.eq_ignore_ascii_case(name)))
    }

    fn parent(&self, element: &usize) -> Option<usize> {
        self.elements.get(*element)?.parent
    }

    fn previous_sibling(&self, element: &usize) -> Option<usize> {
        let parent = self.parent(element)?;
        let siblings = &self.elements[parent].children;
        let index = siblings.iter().position(|c| c == element)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    fn attribute_names(&self, _element: &usize) -> Vec<QualifiedName> {
        self.registry.names()
    }

    fn set_attribute(
        &mut self,
        element: &usize,
        origin: StyleOrigin,
        namespace: Option<&str>,
        name: &str,
        tokens: &[LocatedToken],
    ) -> Result<bool, StyleError> {
        let Some(key) = self.registry.find(namespace, name) else {
            return Err(StyleError::Conversion {
                property: name.to_owned(),
                source: ConversionError::UnknownProperty {
                    name: name.to_owned(),
                    position: tokens.first().map(|t| t.position).unwrap_or_default(),
                },
            });
        };
        let parent = self.parent(element).map(|p| self.styles[p].clone());
        apply_declaration(
            &mut self.styles[*element],
            &key,
            origin,
            tokens,
            parent.as_ref(),
            &self.interner,
        )
        .map_err(|source| StyleError::Conversion {
            property: name.to_owned(),
            source,
        })
    }

    fn reset(&mut self, element: &usize) {
        if let Some(styles) = self.styles.get_mut(*element) {
            styles.clear_origin(StyleOrigin::UserAgent);
            styles.clear_origin(StyleOrigin::Author);
        }
    }
}

use core::fmt;
use core::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

use crate::convert::{Converter, expect_end};
use crate::error::ConversionError;
use crate::model::QualifiedName;
use crate::tokenizer::{CSSToken, LocatedToken, TokenStream};
use crate::values::StyleValue;

/// A styleable property of some element class.
///
/// A simple key converts its value with a [`Converter`] and has an initial
/// value. A composite key (a shorthand) has no value of its own and reads and
/// writes its component keys in order.
pub struct PropertyKey {
    name: QualifiedName,
    kind: KeyKind,
    inherits: bool,
}

enum KeyKind {
    Simple {
        converter: Arc<dyn Converter>,
        initial: Arc<StyleValue>,
    },
    Composite(Vec<Arc<PropertyKey>>),
}

impl PropertyKey {
    /// A property converted by `converter`, starting at `initial`.
    #[must_use]
    pub fn simple(name: QualifiedName, converter: Arc<dyn Converter>, initial: StyleValue) -> Self {
        Self {
            name,
            kind: KeyKind::Simple {
                converter,
                initial: Arc::new(initial),
            },
            inherits: false,
        }
    }

    /// A shorthand over `components`, written as their values separated by
    /// whitespace or commas. Trailing components may be omitted and take
    /// their initial value.
    #[must_use]
    pub fn composite(name: QualifiedName, components: Vec<Arc<Self>>) -> Self {
        Self {
            name,
            kind: KeyKind::Composite(components),
            inherits: false,
        }
    }

    /// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
    ///
    /// Mark the property as inherited.
    #[must_use]
    pub const fn inherited(mut self) -> Self {
        self.inherits = true;
        self
    }

    /// The property name.
    #[must_use]
    pub const fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Whether the property is inherited by default.
    #[must_use]
    pub const fn inherits(&self) -> bool {
        self.inherits
    }

    /// The converter of a simple key.
    #[must_use]
    pub fn converter(&self) -> Option<&dyn Converter> {
        match &self.kind {
            KeyKind::Simple { converter, .. } => Some(converter.as_ref()),
            KeyKind::Composite(_) => None,
        }
    }

    /// The initial value of a simple key.
    #[must_use]
    pub const fn initial(&self) -> Option<&Arc<StyleValue>> {
        match &self.kind {
            KeyKind::Simple { initial, .. } => Some(initial),
            KeyKind::Composite(_) => None,
        }
    }

    /// The component keys of a composite key; empty for simple keys.
    #[must_use]
    pub fn components(&self) -> &[Arc<Self>] {
        match &self.kind {
            KeyKind::Simple { .. } => &[],
            KeyKind::Composite(components) => components,
        }
    }

    /// Whether this key is a shorthand.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.kind, KeyKind::Composite(_))
    }

    /// The simple keys this key writes: itself, or its components recursively.
    #[must_use]
    pub fn leaves(self: &Arc<Self>) -> Vec<Arc<Self>> {
        match &self.kind {
            KeyKind::Simple { .. } => vec![Arc::clone(self)],
            KeyKind::Composite(components) => components.iter().flat_map(Self::leaves).collect(),
        }
    }

    /// Convert a declaration value into one value per leaf key.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] met.
    pub fn convert(
        self: &Arc<Self>,
        tokens: &[LocatedToken],
    ) -> Result<Vec<(Arc<Self>, StyleValue)>, ConversionError> {
        let mut stream = TokenStream::new(tokens);
        let mut values = Vec::new();
        self.parse_into(&mut stream, &mut values)?;
        expect_end(&mut stream)?;
        Ok(values)
    }

    fn parse_into(
        self: &Arc<Self>,
        stream: &mut TokenStream<'_>,
        values: &mut Vec<(Arc<Self>, StyleValue)>,
    ) -> Result<(), ConversionError> {
        match &self.kind {
            KeyKind::Simple { converter, .. } => {
                values.push((Arc::clone(self), converter.parse(stream)?));
            }
            KeyKind::Composite(components) => {
                for (i, component) in components.iter().enumerate() {
                    stream.skip_whitespace();
                    if i > 0 && stream.peek() == &CSSToken::Comma {
                        let _ = stream.next();
                        stream.skip_whitespace();
                    }
                    if stream.peek().is_eof() && i > 0 {
                        for leaf in component.leaves() {
                            if let Some(initial) = leaf.initial() {
                                let initial = StyleValue::clone(initial);
                                values.push((leaf, initial));
                            }
                        }
                    } else {
                        component.parse_into(stream, values)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("PropertyKey");
        let _ = debug.field("name", &self.name).field("inherits", &self.inherits);
        match &self.kind {
            KeyKind::Simple { converter, initial } => {
                let _ = debug
                    .field("converter", &converter.type_name())
                    .field("initial", initial);
            }
            KeyKind::Composite(components) => {
                let names: Vec<&QualifiedName> = components.iter().map(|c| c.name()).collect();
                let _ = debug.field("components", &names);
            }
        }
        debug.finish()
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyKey {}

/// The properties of one element class.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    keys: Vec<Arc<PropertyKey>>,
}

impl PropertyRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` and return the canonical key for its name: the key
    /// registered first wins.
    pub fn register(&mut self, key: PropertyKey) -> Arc<PropertyKey> {
        if let Some(existing) = self.keys.iter().find(|k| k.name == key.name) {
            log::debug!("property {} registered twice; keeping the first", key.name);
            return Arc::clone(existing);
        }
        let key = Arc::new(key);
        self.keys.push(Arc::clone(&key));
        key
    }

    /// Find a key by name. `namespace: None` accepts any namespace and
    /// prefers a key in no namespace.
    #[must_use]
    pub fn find(&self, namespace: Option<&str>, name: &str) -> Option<Arc<PropertyKey>> {
        let mut matches = self.keys.iter().filter(|k| k.name.matches(namespace, name));
        let first = matches.next()?;
        let best = if first.name.namespace.is_empty() {
            first
        } else {
            matches.find(|k| k.name.namespace.is_empty()).unwrap_or(first)
        };
        Some(Arc::clone(best))
    }

    /// All keys in registration order.
    #[must_use]
    pub fn keys(&self) -> &[Arc<PropertyKey>] {
        &self.keys
    }

    /// All property names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<QualifiedName> {
        self.keys.iter().map(|k| k.name.clone()).collect()
    }

    /// Names of the composite keys.
    #[must_use]
    pub fn composite_names(&self) -> Vec<QualifiedName> {
        self.keys
            .iter()
            .filter(|k| k.is_composite())
            .map(|k| k.name.clone())
            .collect()
    }
}

/// Per-element-class registries and name lookups.
///
/// Entries are inserted once and never invalidated, so concurrent readers
/// always agree on the canonical key for a name.
#[derive(Debug)]
pub struct PropertyCache<C: Eq + Hash> {
    registries: DashMap<C, Arc<PropertyRegistry>>,
    lookups: DashMap<(C, Option<String>, String), Arc<PropertyKey>>,
}

impl<C: Eq + Hash + Clone> PropertyCache<C> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registries: DashMap::new(),
            lookups: DashMap::new(),
        }
    }

    /// The registry of `class`, built by `build` on first use.
    pub fn registry(&self, class: &C, build: impl FnOnce() -> PropertyRegistry) -> Arc<PropertyRegistry> {
        if let Some(registry) = self.registries.get(class) {
            return Arc::clone(registry.value());
        }
        self.registries
            .entry(class.clone())
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }

    /// Look up `(namespace, name)` in the registry of `class`, caching the
    /// key when there is one. Unknown names are not remembered.
    pub fn lookup(
        &self,
        class: &C,
        namespace: Option<&str>,
        name: &str,
        build: impl FnOnce() -> PropertyRegistry,
    ) -> Option<Arc<PropertyKey>> {
        let cache_key = (class.clone(), namespace.map(str::to_owned), name.to_owned());
        if let Some(hit) = self.lookups.get(&cache_key) {
            return Some(Arc::clone(hit.value()));
        }
        let found = self.registry(class, build).find(namespace, name)?;
        Some(Arc::clone(self.lookups.entry(cache_key).or_insert(found).value()))
    }

    /// Number of element classes with a registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    /// Whether no registry was built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

impl<C: Eq + Hash + Clone> Default for PropertyCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

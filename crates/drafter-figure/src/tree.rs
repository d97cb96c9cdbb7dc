//! Arena-based figure tree.
//!
//! Every figure lives in one contiguous vector and all relationships are
//! [`FigureId`] indices, giving O(1) access and traversal in any direction
//! without borrowing issues.

use std::collections::BTreeSet;

use drafter_css::StyleMap;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A type-safe index into the figure tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FigureId(pub usize);

impl FigureId {
    /// The drawing figure is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// What a figure is. The lowercase name is the figure's type name in
/// selectors (`rect`, `layer > group`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    /// The whole drawing; the root of every tree.
    Drawing,
    /// A layer of the drawing.
    Layer,
    /// A group of figures.
    Group,
    /// A rectangle.
    Rect,
    /// An ellipse.
    Ellipse,
    /// A straight line.
    Line,
    /// A text label.
    Text,
}

impl FigureKind {
    /// The type name selectors match against.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A figure and its links to the rest of the tree.
#[derive(Debug, Clone)]
pub struct Figure {
    /// What the figure is.
    pub kind: FigureKind,

    /// The figure's id, unique by convention.
    pub id: Option<String>,

    /// Style classes, in insertion order.
    pub style_classes: Vec<String>,

    /// Pseudo-classes the figure has by itself, such as `selected`.
    pub pseudo_classes: BTreeSet<String>,

    /// Inline `style` declarations, applied after the stylesheets.
    pub style: Option<String>,

    /// Origin-layered property values.
    pub styles: StyleMap,

    /// The containing figure; `None` for the root and detached figures.
    pub parent: Option<FigureId>,

    /// Child figures, in paint order.
    pub children: Vec<FigureId>,

    /// The figure immediately after this one in its parent's children.
    pub next_sibling: Option<FigureId>,

    /// The figure immediately before this one in its parent's children.
    pub prev_sibling: Option<FigureId>,
}

impl Figure {
    fn new(kind: FigureKind) -> Self {
        Self {
            kind,
            id: None,
            style_classes: Vec::new(),
            pseudo_classes: BTreeSet::new(),
            style: None,
            styles: StyleMap::new(),
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// Arena-based figure tree with O(1) figure access and traversal.
#[derive(Debug, Clone)]
pub struct FigureTree {
    /// All figures, indexed by `FigureId`. The drawing is at index 0.
    figures: Vec<Figure>,
}

impl FigureTree {
    /// Create a tree holding just the drawing figure.
    #[must_use]
    pub fn new() -> Self {
        Self {
            figures: vec![Figure::new(FigureKind::Drawing)],
        }
    }

    /// The drawing figure.
    #[must_use]
    pub const fn root(&self) -> FigureId {
        FigureId::ROOT
    }

    /// Get a figure by its ID.
    #[must_use]
    pub fn get(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(id.0)
    }

    /// Get a mutable reference to a figure by its ID.
    pub fn get_mut(&mut self, id: FigureId) -> Option<&mut Figure> {
        self.figures.get_mut(id.0)
    }

    /// Number of figures, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Always false: the drawing figure exists from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Allocate a new, detached figure.
    pub fn alloc(&mut self, kind: FigureKind) -> FigureId {
        let id = FigureId(self.figures.len());
        self.figures.push(Figure::new(kind));
        id
    }

    /// Allocate a figure and append it to `parent`.
    pub fn add(&mut self, parent: FigureId, kind: FigureKind) -> FigureId {
        let id = self.alloc(kind);
        self.append_child(parent, id);
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it is attached elsewhere.
    pub fn append_child(&mut self, parent: FigureId, child: FigureId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, or last when
    /// `reference` is `None` or not a child of `parent`.
    ///
    /// Does nothing if `child` is `parent` or one of its ancestors, which
    /// would make the tree cyclic.
    pub fn insert_before(&mut self, parent: FigureId, child: FigureId, reference: Option<FigureId>) {
        if parent.0 >= self.figures.len() || child.0 >= self.figures.len() || parent == child {
            return;
        }
        if self.is_descendant_of(parent, child) {
            log::debug!("refusing to insert {child:?} below its descendant {parent:?}");
            return;
        }
        if let Some(old_parent) = self.figures[child.0].parent {
            self.remove_child(old_parent, child);
        }

        let children = &mut self.figures[parent.0].children;
        let index = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        children.insert(index, child);

        let prev = index.checked_sub(1).map(|i| children[i]);
        let next = children.get(index + 1).copied();

        let figure = &mut self.figures[child.0];
        figure.parent = Some(parent);
        figure.prev_sibling = prev;
        figure.next_sibling = next;
        if let Some(prev) = prev {
            self.figures[prev.0].next_sibling = Some(child);
        }
        if let Some(next) = next {
            self.figures[next.0].prev_sibling = Some(child);
        }
    }

    /// Detach `child` from `parent`. Does nothing if it is not a child.
    pub fn remove_child(&mut self, parent: FigureId, child: FigureId) {
        let Some(index) = self
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == child))
        else {
            return;
        };
        let _ = self.figures[parent.0].children.remove(index);

        let figure = &mut self.figures[child.0];
        let prev = figure.prev_sibling.take();
        let next = figure.next_sibling.take();
        figure.parent = None;
        if let Some(prev) = prev {
            self.figures[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.figures[next.0].prev_sibling = prev;
        }
    }

    /// Move every child of `from` to the end of `to`, keeping their order.
    pub fn move_children(&mut self, from: FigureId, to: FigureId) {
        if from == to {
            return;
        }
        for child in self.children(from).to_vec() {
            self.append_child(to, child);
        }
    }

    /// Get the parent of a figure.
    #[must_use]
    pub fn parent(&self, id: FigureId) -> Option<FigureId> {
        self.get(id).and_then(|f| f.parent)
    }

    /// Get all children of a figure.
    #[must_use]
    pub fn children(&self, id: FigureId) -> &[FigureId] {
        self.get(id).map_or(&[], |f| f.children.as_slice())
    }

    /// Get the next sibling of a figure.
    #[must_use]
    pub fn next_sibling(&self, id: FigureId) -> Option<FigureId> {
        self.get(id).and_then(|f| f.next_sibling)
    }

    /// Get the previous sibling of a figure.
    #[must_use]
    pub fn prev_sibling(&self, id: FigureId) -> Option<FigureId> {
        self.get(id).and_then(|f| f.prev_sibling)
    }

    /// Iterate over all ancestors of a figure, from parent to root.
    pub fn ancestors(&self, id: FigureId) -> impl Iterator<Item = FigureId> + '_ {
        core::iter::successors(self.parent(id), |&f| self.parent(f))
    }

    /// Whether `ancestor` is a strict ancestor of `descendant`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: FigureId, ancestor: FigureId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// `id` and everything below it, parents before children.
    #[must_use]
    pub fn preorder(&self, id: FigureId) -> Vec<FigureId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() {
                continue;
            }
            order.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        order
    }

    /// Set the figure's id.
    pub fn set_id(&mut self, id: FigureId, value: impl Into<String>) {
        if let Some(figure) = self.get_mut(id) {
            figure.id = Some(value.into());
        }
    }

    /// Add a style class. Returns whether it was new.
    pub fn add_style_class(&mut self, id: FigureId, class: &str) -> bool {
        let Some(figure) = self.get_mut(id) else {
            return false;
        };
        if figure.style_classes.iter().any(|c| c == class) {
            return false;
        }
        figure.style_classes.push(class.to_owned());
        true
    }

    /// Remove a style class. Returns whether it was present.
    pub fn remove_style_class(&mut self, id: FigureId, class: &str) -> bool {
        let Some(figure) = self.get_mut(id) else {
            return false;
        };
        let before = figure.style_classes.len();
        figure.style_classes.retain(|c| c != class);
        figure.style_classes.len() != before
    }

    /// Set or clear the figure's inline style.
    pub fn set_inline_style(&mut self, id: FigureId, style: Option<&str>) {
        if let Some(figure) = self.get_mut(id) {
            figure.style = style.map(str::to_owned);
        }
    }

    /// Give the figure an intrinsic pseudo-class (stored lowercased).
    pub fn set_pseudo_class(&mut self, id: FigureId, name: &str, on: bool) {
        if let Some(figure) = self.get_mut(id) {
            let name = name.to_ascii_lowercase();
            let _ = if on {
                figure.pseudo_classes.insert(name)
            } else {
                figure.pseudo_classes.remove(&name)
            };
        }
    }

    /// The styles of `id` for writing, with its parent's styles for reading.
    pub fn styles_with_parent(&mut self, id: FigureId) -> Option<(&mut StyleMap, Option<&StyleMap>)> {
        match self.parent(id) {
            None => Some((&mut self.get_mut(id)?.styles, None)),
            Some(parent) if parent.0 < id.0 => {
                let (head, tail) = self.figures.split_at_mut(id.0);
                Some((&mut tail.first_mut()?.styles, Some(&head.get(parent.0)?.styles)))
            }
            Some(parent) => {
                let (head, tail) = self.figures.split_at_mut(parent.0);
                Some((&mut head.get_mut(id.0)?.styles, Some(&tail.first()?.styles)))
            }
        }
    }
}

impl Default for FigureTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder_visits_parents_first() {
        let mut tree = FigureTree::new();
        let layer = tree.add(FigureId::ROOT, FigureKind::Layer);
        let group = tree.add(layer, FigureKind::Group);
        let rect = tree.add(group, FigureKind::Rect);
        let text = tree.add(layer, FigureKind::Text);
        assert_eq!(tree.preorder(FigureId::ROOT), vec![FigureId::ROOT, layer, group, rect, text]);
    }

    #[test]
    fn test_styles_with_parent_after_reparenting() {
        let mut tree = FigureTree::new();
        let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
        let group = tree.add(FigureId::ROOT, FigureKind::Group);
        tree.append_child(group, rect);
        assert_eq!(tree.parent(rect), Some(group));
        assert!(matches!(tree.styles_with_parent(rect), Some((_, Some(_)))));
        assert!(matches!(tree.styles_with_parent(FigureId::ROOT), Some((_, None))));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FigureKind::Ellipse.to_string(), "ellipse");
        assert_eq!("RECT".parse::<FigureKind>().ok(), Some(FigureKind::Rect));
    }
}

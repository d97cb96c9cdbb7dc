//! Tests for figure tree mutation: remove_child, insert_before, move_children.

use drafter_css::{PseudoClassStates, parse_selector_group};
use drafter_figure::{FigureId, FigureKind, FigureSelectorModel, FigureTree};

/// A tree with one group under the drawing, returned with the group's id.
fn tree_with_group() -> (FigureTree, FigureId) {
    let mut tree = FigureTree::new();
    let group = tree.add(FigureId::ROOT, FigureKind::Group);
    (tree, group)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let (mut tree, group) = tree_with_group();
    let rect = tree.add(group, FigureKind::Rect);
    assert_eq!(tree.children(group).len(), 1);

    tree.remove_child(group, rect);

    assert!(tree.children(group).is_empty());
    assert_eq!(tree.parent(rect), None);
    assert_eq!(tree.prev_sibling(rect), None);
    assert_eq!(tree.next_sibling(rect), None);
}

#[test]
fn test_remove_child_first_of_three() {
    let (mut tree, group) = tree_with_group();
    let a = tree.add(group, FigureKind::Rect);
    let b = tree.add(group, FigureKind::Ellipse);
    let c = tree.add(group, FigureKind::Line);

    tree.remove_child(group, a);

    assert_eq!(tree.children(group), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_remove_child_middle_of_three() {
    let (mut tree, group) = tree_with_group();
    let a = tree.add(group, FigureKind::Rect);
    let b = tree.add(group, FigureKind::Ellipse);
    let c = tree.add(group, FigureKind::Line);

    tree.remove_child(group, b);

    assert_eq!(tree.children(group), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_of_other_parent_is_noop() {
    let (mut tree, group) = tree_with_group();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);

    tree.remove_child(group, rect);

    assert_eq!(tree.parent(rect), Some(FigureId::ROOT));
    assert_eq!(tree.prev_sibling(rect), Some(group));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let (mut tree, group) = tree_with_group();
    let existing = tree.add(group, FigureKind::Rect);

    let new_child = tree.alloc(FigureKind::Text);
    tree.insert_before(group, new_child, Some(existing));

    assert_eq!(tree.children(group), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(group));
    assert_eq!(tree.next_sibling(new_child), Some(existing));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_middle() {
    let (mut tree, group) = tree_with_group();
    let a = tree.add(group, FigureKind::Rect);
    let c = tree.add(group, FigureKind::Line);

    let b = tree.alloc(FigureKind::Ellipse);
    tree.insert_before(group, b, Some(c));

    assert_eq!(tree.children(group), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_insert_before_reattaches() {
    let (mut tree, group) = tree_with_group();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    let text = tree.add(group, FigureKind::Text);

    tree.insert_before(group, rect, Some(text));

    assert_eq!(tree.children(FigureId::ROOT), &[group]);
    assert_eq!(tree.next_sibling(group), None);
    assert_eq!(tree.children(group), &[rect, text]);
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = FigureTree::new();
    let from = tree.add(FigureId::ROOT, FigureKind::Layer);
    let to = tree.add(FigureId::ROOT, FigureKind::Layer);
    let existing = tree.add(to, FigureKind::Rect);
    let a = tree.add(from, FigureKind::Ellipse);
    let b = tree.add(from, FigureKind::Line);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, a, b]);
    assert_eq!(tree.parent(a), Some(to));
    assert_eq!(tree.next_sibling(existing), Some(a));
    assert_eq!(tree.prev_sibling(b), Some(a));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = FigureTree::new();
    let from = tree.add(FigureId::ROOT, FigureKind::Layer);
    let to = tree.add(FigureId::ROOT, FigureKind::Layer);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}

#[test]
fn test_ancestors_walk_to_root() {
    let (mut tree, group) = tree_with_group();
    let inner = tree.add(group, FigureKind::Group);
    let text = tree.add(inner, FigureKind::Text);

    let ancestors: Vec<FigureId> = tree.ancestors(text).collect();
    assert_eq!(ancestors, vec![inner, group, FigureId::ROOT]);
}

// ========== cycles ==========

#[test]
fn test_insert_below_own_descendant_is_refused() {
    let mut tree = FigureTree::new();
    let layer = tree.add(FigureId::ROOT, FigureKind::Layer);
    let group = tree.add(layer, FigureKind::Group);

    tree.append_child(group, layer);
    tree.insert_before(group, FigureId::ROOT, None);

    assert_eq!(tree.parent(layer), Some(FigureId::ROOT));
    assert_eq!(tree.parent(group), Some(layer));
    assert!(tree.children(group).is_empty());
    assert!(tree.is_descendant_of(group, FigureId::ROOT));
    assert!(!tree.is_descendant_of(layer, group));
}

#[test]
fn test_descendant_matching_after_refused_cycle() {
    let mut tree = FigureTree::new();
    let layer = tree.add(FigureId::ROOT, FigureKind::Layer);
    let group = tree.add(layer, FigureKind::Group);
    tree.append_child(group, layer);

    let model = FigureSelectorModel::new(tree);
    let states = PseudoClassStates::new();
    assert!(!parse_selector_group("ellipse group").matches(&model, &group, &states));
    assert!(parse_selector_group("drawing group").matches(&model, &group, &states));
}

#[test]
fn test_move_children_into_own_descendant_keeps_that_branch() {
    let (mut tree, group) = tree_with_group();
    let inner = tree.add(group, FigureKind::Group);
    let rect = tree.add(group, FigureKind::Rect);

    tree.move_children(group, inner);

    assert_eq!(tree.children(group), &[inner]);
    assert_eq!(tree.children(inner), &[rect]);
}

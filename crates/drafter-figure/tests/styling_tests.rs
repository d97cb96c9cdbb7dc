//! Styling figure trees through stylesheets, inline styles and the user origin.

use drafter_css::{
    ColorValue, ParserConfig, PseudoClassStates, SelectorModel, SizeValue, StyleError,
    StyleOrigin, StyleValue, StylesheetsManager,
};
use drafter_figure::{FigureId, FigureKind, FigureSelectorModel, FigureTree};

fn author(css: &str) -> StylesheetsManager {
    let mut manager = StylesheetsManager::new();
    let _ = manager.add_css(css, ParserConfig::default());
    manager
}

fn red() -> StyleValue {
    StyleValue::Color(ColorValue::rgb(255, 0, 0))
}

fn fill(model: &FigureSelectorModel, figure: FigureId) -> Option<StyleValue> {
    model.styled(figure, "fill").map(|v| StyleValue::clone(&v))
}

#[test]
fn test_selected_hover_follows_state() {
    let mut tree = FigureTree::new();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    let _ = tree.add_style_class(rect, "selected");
    let mut model = FigureSelectorModel::new(tree);
    let manager = author(".selected:hover { fill: #ff0000; }");

    let mut states = PseudoClassStates::new();
    let _ = states.insert("hover", rect);
    assert!(model.style_tree(&manager, &states).is_empty());
    assert_eq!(fill(&model, rect), Some(red()));

    let _ = states.remove("hover", &rect);
    assert!(model.style_tree(&manager, &states).is_empty());
    assert_eq!(
        fill(&model, rect),
        Some(StyleValue::Color(ColorValue::WHITE))
    );
}

#[test]
fn test_attribute_prefix_on_styled_name() {
    let mut tree = FigureTree::new();
    let foo = tree.add(FigureId::ROOT, FigureKind::Rect);
    let bar = tree.add(FigureId::ROOT, FigureKind::Rect);
    let mut model = FigureSelectorModel::new(tree);
    assert!(model.set_property(foo, StyleOrigin::User, "name", "foobar").unwrap());
    assert!(model.set_property(bar, StyleOrigin::User, "name", "barfoo").unwrap());

    let manager = author(r#"[name^="foo"] { fill: red; }"#);
    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(fill(&model, foo), Some(red()));
    assert_ne!(fill(&model, bar), Some(red()));
}

#[test]
fn test_inherit_copies_parent_value() {
    let mut tree = FigureTree::new();
    let group = tree.add(FigureId::ROOT, FigureKind::Group);
    let text = tree.add(group, FigureKind::Text);
    let mut model = FigureSelectorModel::new(tree);
    let manager = author("group { font-size: 20pt; } text { font-size: inherit; }");

    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(
        model.styled(text, "font-size").as_deref(),
        Some(&StyleValue::Size(SizeValue::new(20.0, "pt")))
    );
}

#[test]
fn test_inherit_at_root_uses_initial_value() {
    let mut model = FigureSelectorModel::new(FigureTree::new());
    let manager = author("drawing { opacity: inherit; }");

    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(
        model.styled(FigureId::ROOT, "opacity").as_deref(),
        Some(&StyleValue::Number(1.0))
    );
}

#[test]
fn test_initial_falls_back_to_lower_origin() {
    let mut tree = FigureTree::new();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    let mut model = FigureSelectorModel::new(tree);

    assert!(model.set_property(rect, StyleOrigin::User, "opacity", "0.5").unwrap());
    assert!(model.set_property(rect, StyleOrigin::Author, "opacity", "0.25").unwrap());
    assert_eq!(model.styled(rect, "opacity").as_deref(), Some(&StyleValue::Number(0.25)));

    assert!(model.set_property(rect, StyleOrigin::Author, "opacity", "initial").unwrap());
    assert_eq!(model.styled(rect, "opacity").as_deref(), Some(&StyleValue::Number(0.5)));

    assert!(model.set_property(rect, StyleOrigin::User, "opacity", "initial").unwrap());
    assert_eq!(model.styled(rect, "opacity").as_deref(), Some(&StyleValue::Number(1.0)));
}

#[test]
fn test_composite_translate() {
    let mut tree = FigureTree::new();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    let mut model = FigureSelectorModel::new(tree);
    let manager = author("rect { translate: 10px, 20px; }");

    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(
        model.styled(rect, "translate-y").as_deref(),
        Some(&StyleValue::Size(SizeValue::new(20.0, "px")))
    );
    assert_eq!(
        model.attribute_value(&rect, None, "translate").as_deref(),
        Some("10px 20px")
    );
    assert!(model.composed_attribute_names(&rect).iter().any(|n| n.name == "translate"));
    assert!(!model.decomposed_attribute_names(&rect).iter().any(|n| n.name == "translate"));
}

#[test]
fn test_reset_keeps_user_values() {
    let mut tree = FigureTree::new();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    let mut model = FigureSelectorModel::new(tree);
    assert!(model.set_property(rect, StyleOrigin::User, "stroke-width", "3").unwrap());

    let manager = author("rect { stroke-width: 5; fill: red; }");
    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(model.styled(rect, "stroke-width").as_deref(), Some(&StyleValue::Number(5.0)));

    model.reset(&rect);
    assert_eq!(model.styled(rect, "stroke-width").as_deref(), Some(&StyleValue::Number(3.0)));
    assert_eq!(fill(&model, rect), Some(StyleValue::Color(ColorValue::WHITE)));
}

#[test]
fn test_bad_declarations_are_skipped() {
    let mut tree = FigureTree::new();
    let group = tree.add(FigureId::ROOT, FigureKind::Group);
    let mut model = FigureSelectorModel::new(tree);
    let manager = author("group { fill: red; opacity: 7; name: kept; }");

    let errors = model.style_tree(&manager, &PseudoClassStates::new());
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, StyleError::Conversion { .. })));
    assert_eq!(
        model.attribute_value(&group, None, "name").as_deref(),
        Some("kept")
    );
}

#[test]
fn test_inline_style_beats_stylesheet() {
    let mut tree = FigureTree::new();
    let rect = tree.add(FigureId::ROOT, FigureKind::Rect);
    tree.set_id(rect, "frame");
    tree.set_inline_style(rect, Some("fill: blue"));
    let mut model = FigureSelectorModel::new(tree);
    let manager = author("#frame { fill: red; }");

    assert!(model.style_tree(&manager, &PseudoClassStates::new()).is_empty());
    assert_eq!(
        fill(&model, rect),
        Some(StyleValue::Color(ColorValue::rgb(0, 0, 255)))
    );
}

#[test]
fn test_structural_pseudo_classes() {
    let mut tree = FigureTree::new();
    let layer = tree.add(FigureId::ROOT, FigureKind::Layer);
    let first = tree.add(layer, FigureKind::Rect);
    let last = tree.add(layer, FigureKind::Ellipse);
    tree.set_pseudo_class(last, "Selected", true);
    let model = FigureSelectorModel::new(tree);

    assert!(model.has_intrinsic_pseudo_class(&FigureId::ROOT, "root"));
    assert!(model.has_intrinsic_pseudo_class(&first, "first-child"));
    assert!(!model.has_intrinsic_pseudo_class(&first, "last-child"));
    assert!(model.has_intrinsic_pseudo_class(&last, "last-child"));
    assert!(model.has_intrinsic_pseudo_class(&last, "selected"));
    assert!(model.has_intrinsic_pseudo_class(&first, "empty"));
    assert!(!model.has_intrinsic_pseudo_class(&layer, "empty"));
}

#[test]
fn test_unknown_property_reported() {
    let mut tree = FigureTree::new();
    let group = tree.add(FigureId::ROOT, FigureKind::Group);
    let mut model = FigureSelectorModel::new(tree);

    let Err(StyleError::Conversion { property, .. }) =
        model.set_property(group, StyleOrigin::Author, "radius-x", "4")
    else {
        panic!("groups have no radius");
    };
    assert_eq!(property, "radius-x");
}

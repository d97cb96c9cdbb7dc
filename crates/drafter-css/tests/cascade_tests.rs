//! Integration tests for the stylesheet manager and origin-layered storage.

mod common;

use common::TestTree;
use drafter_css::{
    ColorValue, ParserConfig, PseudoClassStates, Specificity, StyleError, StyleOrigin,
    StyleValue, StylesheetsManager, apply_inline_style,
};

fn color(r: u8, g: u8, b: u8) -> Option<StyleValue> {
    Some(StyleValue::Color(ColorValue::rgb(r, g, b)))
}

fn manager(sheets: &[(StyleOrigin, &str)]) -> StylesheetsManager {
    let mut manager = StylesheetsManager::new();
    for (origin, css) in sheets {
        let _ = manager.add_css(css, ParserConfig::with_origin(*origin));
    }
    manager
}

/// drawing > layer > (rect#r.shape, rect.shape)
fn sample() -> (TestTree, usize, usize, usize) {
    let mut tree = TestTree::new("drawing");
    let layer = tree.add(0, "layer");
    let first = tree.add_with(layer, "rect", Some("r"), &["shape"]);
    let second = tree.add_with(layer, "rect", None, &["shape"]);
    (tree, layer, first, second)
}

fn style(tree: &mut TestTree, manager: &StylesheetsManager) -> Vec<StyleError> {
    let elements = tree.all();
    manager.apply_to_tree(tree, elements, &PseudoClassStates::new())
}

#[test]
fn test_specificity_then_order() {
    let (mut tree, _, first, second) = sample();
    let manager = manager(&[(
        StyleOrigin::Author,
        "#r { fill: red } .shape { fill: blue } rect { fill: green } .shape { fill: yellow }",
    )]);
    assert!(style(&mut tree, &manager).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(255, 0, 0));
    assert_eq!(tree.styled(second, "fill"), color(255, 255, 0));
}

#[test]
fn test_matching_declarations_are_sorted() {
    let (tree, _, first, _) = sample();
    let manager = manager(&[
        (StyleOrigin::Author, "#r { fill: red } rect { width: 2 !important }"),
        (StyleOrigin::UserAgent, "* { fill: black; width: 1 }"),
    ]);
    let matched = manager.matching_declarations(&tree, &first, &PseudoClassStates::new());
    let summary: Vec<(StyleOrigin, bool, Specificity, &str)> = matched
        .iter()
        .map(|m| (m.origin, m.important, m.specificity, m.declaration.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (StyleOrigin::UserAgent, false, Specificity(0, 0, 0), "fill"),
            (StyleOrigin::UserAgent, false, Specificity(0, 0, 0), "width"),
            (StyleOrigin::Author, false, Specificity(1, 0, 0), "fill"),
            (StyleOrigin::Author, true, Specificity(0, 0, 1), "width"),
        ]
    );
}

#[test]
fn test_important_beats_specificity_within_origin() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(
        StyleOrigin::Author,
        "rect { fill: blue !important } #r { fill: red }",
    )]);
    assert!(style(&mut tree, &manager).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 255));
}

#[test]
fn test_higher_origin_wins() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[
        (StyleOrigin::Author, "rect { fill: blue }"),
        (StyleOrigin::UserAgent, "#r { fill: red !important }"),
    ]);
    assert!(style(&mut tree, &manager).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 255));
    assert_eq!(tree.origin(first, "fill"), Some(StyleOrigin::Author));
}

#[test]
fn test_initial_falls_back_to_next_origin() {
    let (mut tree, _, first, second) = sample();
    let manager = manager(&[
        (StyleOrigin::UserAgent, "rect { fill: red }"),
        (StyleOrigin::Author, "#r { fill: initial } rect { fill: blue }"),
    ]);
    assert!(style(&mut tree, &manager).is_empty());
    // "#r" is more specific, so `initial` is written last and removes the
    // author value.
    assert_eq!(tree.styled(first, "fill"), color(255, 0, 0));
    assert_eq!(tree.origin(first, "fill"), Some(StyleOrigin::UserAgent));
    assert_eq!(tree.styled(second, "fill"), color(0, 0, 255));
}

#[test]
fn test_initial_without_lower_origin_uses_initial_value() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(StyleOrigin::Author, "rect { fill: red } #r { fill: initial }")]);
    assert!(style(&mut tree, &manager).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 0));
    assert_eq!(tree.origin(first, "fill"), None);
}

#[test]
fn test_inherit() {
    let (mut tree, layer, first, _) = sample();
    let manager = manager(&[(
        StyleOrigin::Author,
        "layer { width: 7 } #r { width: inherit } drawing { width: inherit }",
    )]);
    assert!(style(&mut tree, &manager).is_empty());
    assert_eq!(tree.styled(layer, "width"), Some(StyleValue::Number(7.0)));
    assert_eq!(tree.styled(first, "width"), Some(StyleValue::Number(7.0)));
    assert_eq!(tree.styled(0, "width"), Some(StyleValue::Number(1.0)));
    assert_eq!(tree.origin(0, "width"), Some(StyleOrigin::Author));
}

#[test]
fn test_failures_are_collected_and_skipped() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(
        StyleOrigin::Author,
        "#r { fill: 12; bogus: 1; width: 3 }",
    )]);
    let errors = style(&mut tree, &manager);
    assert_eq!(errors.len(), 2);
    assert_eq!(tree.styled(first, "width"), Some(StyleValue::Number(3.0)));
}

#[test]
fn test_restyle_keeps_user_values() {
    let (mut tree, _, first, _) = sample();
    let user = manager(&[(StyleOrigin::User, "#r { fill: red }")]);
    assert!(style(&mut tree, &user).is_empty());

    let author = manager(&[(StyleOrigin::Author, "#r { fill: blue }")]);
    assert!(style(&mut tree, &author).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 255));

    assert!(style(&mut tree, &StylesheetsManager::new()).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(255, 0, 0));
}

#[test]
fn test_clear_origin_stylesheets() {
    let mut manager = manager(&[
        (StyleOrigin::Author, "rect { fill: blue }"),
        (StyleOrigin::UserAgent, "rect { fill: red }"),
    ]);
    manager.clear(StyleOrigin::Author);
    assert_eq!(manager.stylesheets().len(), 1);
    assert_eq!(manager.stylesheets()[0].origin, StyleOrigin::UserAgent);
}

#[test]
fn test_hover_rule_follows_state() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(StyleOrigin::Author, ".shape:hover { fill: #ff0000; }")]);
    let mut states = PseudoClassStates::new();
    let _ = states.insert("hover", first);

    let elements = tree.all();
    assert!(manager.apply_to_tree(&mut tree, elements.clone(), &states).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(255, 0, 0));

    let _ = states.remove("hover", &first);
    assert!(manager.apply_to_tree(&mut tree, elements, &states).is_empty());
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 0));
}

#[test]
fn test_namespaced_declarations() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(
        StyleOrigin::Author,
        r#"@namespace t "urn:test"; #r { t|label: "hello"; |label: "nope" }"#,
    )]);
    let errors = style(&mut tree, &manager);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        tree.styled(first, "label"),
        Some(StyleValue::String("hello".to_owned()))
    );
}

#[test]
fn test_inline_style_after_rules() {
    let (mut tree, _, first, _) = sample();
    let manager = manager(&[(StyleOrigin::Author, "#r { fill: red; width: 4 }")]);
    assert!(style(&mut tree, &manager).is_empty());

    let errors = apply_inline_style(&mut tree, &first, "width: 9 !important; fill: blue; width: 8; nope");
    assert_eq!(errors.len(), 1);
    assert_eq!(tree.styled(first, "fill"), color(0, 0, 255));
    assert_eq!(tree.styled(first, "width"), Some(StyleValue::Number(9.0)));
}

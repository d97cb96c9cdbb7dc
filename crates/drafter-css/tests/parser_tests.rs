//! Integration tests for the stylesheet parser.

use drafter_css::parser::parse_declaration_list;
use drafter_css::{ParserConfig, Rule, Selector, StyleOrigin, parse_stylesheet};

fn parse(css: &str) -> drafter_css::Stylesheet {
    parse_stylesheet(css, ParserConfig::default())
}

#[test]
fn test_simple_rule() {
    let sheet = parse("rect { fill: red; stroke-width: 2 }");
    assert!(sheet.errors.is_empty());
    let rules: Vec<_> = sheet.style_rules().collect();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selectors.selectors, vec![Selector::type_name("rect")]);

    let declarations = &rules[0].declarations;
    assert_eq!(declarations.len(), 2);
    assert_eq!(declarations[0].name, "fill");
    assert_eq!(declarations[0].value_text(), "red");
    assert_eq!(declarations[1].name, "stroke-width");
    assert_eq!(declarations[1].value_text(), "2");
}

#[test]
fn test_origin_and_source_come_from_config() {
    let config = ParserConfig::with_origin(StyleOrigin::UserAgent).source("ua.css");
    let sheet = parse_stylesheet("* { visible: true }", config);
    assert_eq!(sheet.origin, StyleOrigin::UserAgent);
    assert_eq!(sheet.source.as_deref(), Some("ua.css"));
}

#[test]
fn test_important() {
    let sheet = parse("rect { fill: red !important; stroke: blue ! IMPORTANT; opacity: 1 }");
    let rule = sheet.style_rules().next().unwrap();
    let flags: Vec<bool> = rule.declarations.iter().map(|d| d.important).collect();
    assert_eq!(flags, vec![true, true, false]);
    assert_eq!(rule.declarations[0].value_text(), "red");
}

#[test]
fn test_value_keeps_functions_and_blocks() {
    let sheet = parse("rect { transforms: rotate(45) scale(2, 2); fill: rgb(1, 2, 3) }");
    let rule = sheet.style_rules().next().unwrap();
    assert_eq!(rule.declarations.len(), 2);
    assert_eq!(rule.declarations[0].value_text(), "rotate(45) scale(2, 2)");
}

#[test]
fn test_recovers_from_bad_declarations() {
    let sheet = parse("rect { fill red; : blue; stroke: ; opacity: 0.5 } ellipse { fill: green }");
    let rules: Vec<_> = sheet.style_rules().collect();
    assert_eq!(rules.len(), 2);
    let names: Vec<&str> = rules[0].declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["opacity"]);
    assert_eq!(sheet.errors.len(), 3);
    assert_eq!(rules[1].declarations[0].name, "fill");
}

#[test]
fn test_bad_selector_keeps_rule_as_nothing() {
    let sheet = parse("rect >> ellipse { fill: red } text { fill: blue }");
    let rules: Vec<_> = sheet.style_rules().collect();
    assert_eq!(rules.len(), 2);
    assert!(rules[0].selectors.is_nothing());
    assert_eq!(sheet.errors.len(), 1);
}

#[test]
fn test_ignore_errors() {
    let config = ParserConfig {
        ignore_errors: true,
        ..ParserConfig::default()
    };
    let sheet = parse_stylesheet("rect { fill red } ellipse { fill: green }", config);
    assert!(sheet.errors.is_empty());
    assert_eq!(sheet.style_rules().count(), 2);
}

#[test]
fn test_error_positions() {
    let sheet = parse("rect {\n  fill red;\n}");
    assert_eq!(sheet.errors.len(), 1);
    assert_eq!(sheet.errors[0].position.line, 2);
}

#[test]
fn test_at_rules_are_kept() {
    let sheet = parse("@media print { rect { fill: red } } rect { fill: blue }");
    assert!(matches!(&sheet.rules[0], Rule::At(at) if at.name == "media" && at.block.is_some()));
    assert_eq!(sheet.style_rules().count(), 1);
}

#[test]
fn test_namespace_prefixes() {
    let sheet = parse(
        r#"@namespace d url(urn:drafter);
        @namespace "urn:default";
        d|rect { d|label: x; |fill: red; *|width: 2; stroke: blue }
        rect { fill: red }"#,
    );
    assert!(sheet.errors.is_empty(), "{:?}", sheet.errors);
    let rules: Vec<_> = sheet.style_rules().collect();

    assert_eq!(
        rules[0].selectors.selectors[0],
        Selector::Type {
            namespace: Some("urn:drafter".to_owned()),
            name: "rect".to_owned(),
        }
    );
    // The default namespace applies to unprefixed type selectors.
    assert_eq!(
        rules[1].selectors.selectors[0],
        Selector::Type {
            namespace: Some("urn:default".to_owned()),
            name: "rect".to_owned(),
        }
    );

    let namespaces: Vec<Option<&str>> = rules[0]
        .declarations
        .iter()
        .map(|d| d.namespace.as_deref())
        .collect();
    assert_eq!(namespaces, vec![Some("urn:drafter"), Some(""), None, None]);
    assert_eq!(rules[0].declarations[0].qualified_name(), "urn:drafter|label");
}

#[test]
fn test_undeclared_prefixes() {
    let sheet = parse("x|rect { fill: red } rect { x|fill: red; stroke: blue }");
    let rules: Vec<_> = sheet.style_rules().collect();
    assert!(rules[0].selectors.is_nothing());
    assert_eq!(rules[1].declarations.len(), 1);
    assert_eq!(sheet.errors.len(), 2);
}

#[test]
fn test_declaration_list() {
    let (declarations, errors) = parse_declaration_list("fill: red; bogus; opacity: 0.5 !important");
    assert_eq!(declarations.len(), 2);
    assert!(declarations[1].important);
    assert_eq!(errors.len(), 1);
}

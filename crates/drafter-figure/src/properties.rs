//! The styleable properties of each figure kind.

use std::sync::Arc;

use drafter_css::convert::{
    BooleanConverter, ColorConverter, EnumConverter, NumberConverter, SizeConverter,
    StringConverter, TransformListConverter, WordListConverter,
};
use drafter_css::{ColorValue, PropertyKey, PropertyRegistry, QualifiedName, SizeValue, StyleValue};

use crate::tree::FigureKind;

const LENGTH_UNITS: &[&str] = &["px"];
const FONT_UNITS: &[&str] = &["px", "pt"];
const STROKE_CAPS: &[&str] = &["butt", "round", "square"];
const TEXT_ANCHORS: &[&str] = &["start", "middle", "end"];

fn key(name: &str, converter: impl drafter_css::Converter + 'static, initial: StyleValue) -> PropertyKey {
    PropertyKey::simple(QualifiedName::local(name), Arc::new(converter), initial)
}

fn length(name: &str, initial: f64) -> PropertyKey {
    key(
        name,
        SizeConverter::with_units(LENGTH_UNITS),
        StyleValue::Size(SizeValue::unitless(initial)),
    )
}

fn point(registry: &mut PropertyRegistry, name: &str) {
    let x = registry.register(length(&format!("{name}-x"), 0.0));
    let y = registry.register(length(&format!("{name}-y"), 0.0));
    let _ = registry.register(PropertyKey::composite(QualifiedName::local(name), vec![x, y]));
}

/// Properties every figure has.
fn register_common(registry: &mut PropertyRegistry) {
    let _ = registry.register(key("name", StringConverter, StyleValue::String(String::new())));
    let _ = registry.register(key("visible", BooleanConverter, StyleValue::Boolean(true)));
    let _ = registry.register(key(
        "opacity",
        NumberConverter::in_range(0.0, 1.0),
        StyleValue::Number(1.0),
    ));
    let _ = registry.register(key("tags", WordListConverter, StyleValue::WordList(Vec::new())));
    point(registry, "translate");
    let _ = registry.register(key(
        "transforms",
        TransformListConverter,
        StyleValue::Transforms(Vec::new()),
    ));
    let _ = registry.register(
        key(
            "font-family",
            StringConverter,
            StyleValue::String("sans-serif".to_owned()),
        )
        .inherited(),
    );
    let _ = registry.register(
        key(
            "font-size",
            SizeConverter::with_units(FONT_UNITS),
            StyleValue::Size(SizeValue::new(12.0, "pt")),
        )
        .inherited(),
    );
}

/// Paint properties of anything drawn with fill and stroke.
fn register_paint(registry: &mut PropertyRegistry) {
    let _ = registry.register(key("fill", ColorConverter, StyleValue::Color(ColorValue::WHITE)));
    let _ = registry.register(key("stroke", ColorConverter, StyleValue::Color(ColorValue::BLACK)));
    let _ = registry.register(key(
        "stroke-width",
        NumberConverter::in_range(0.0, f64::MAX),
        StyleValue::Number(1.0),
    ));
    let _ = registry.register(key(
        "stroke-cap",
        EnumConverter::new(STROKE_CAPS),
        StyleValue::Keyword("butt".to_owned()),
    ));
}

/// Build the property registry of `kind`.
#[must_use]
pub fn registry_for(kind: FigureKind) -> PropertyRegistry {
    log::trace!("building property registry for {kind}");
    let mut registry = PropertyRegistry::new();
    register_common(&mut registry);
    match kind {
        FigureKind::Drawing => {
            let _ = registry.register(key(
                "background",
                ColorConverter,
                StyleValue::Color(ColorValue::WHITE),
            ));
            let _ = registry.register(length("width", 640.0));
            let _ = registry.register(length("height", 480.0));
        }
        FigureKind::Layer | FigureKind::Group => {
            let _ = registry.register(key("locked", BooleanConverter, StyleValue::Boolean(false)));
        }
        FigureKind::Rect => {
            register_paint(&mut registry);
            let _ = registry.register(length("x", 0.0));
            let _ = registry.register(length("y", 0.0));
            let _ = registry.register(length("width", 0.0));
            let _ = registry.register(length("height", 0.0));
            let _ = registry.register(length("arc", 0.0));
        }
        FigureKind::Ellipse => {
            register_paint(&mut registry);
            point(&mut registry, "center");
            let _ = registry.register(length("radius-x", 0.0));
            let _ = registry.register(length("radius-y", 0.0));
        }
        FigureKind::Line => {
            register_paint(&mut registry);
            point(&mut registry, "start");
            point(&mut registry, "end");
        }
        FigureKind::Text => {
            register_paint(&mut registry);
            let _ = registry.register(length("x", 0.0));
            let _ = registry.register(length("y", 0.0));
            let _ = registry.register(key("text", StringConverter, StyleValue::String(String::new())));
            let _ = registry.register(key(
                "text-anchor",
                EnumConverter::new(TEXT_ANCHORS),
                StyleValue::Keyword("start".to_owned()),
            ));
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_kind_has_common_properties() {
        for kind in FigureKind::iter() {
            let registry = registry_for(kind);
            for name in ["name", "opacity", "translate", "translate-x", "transforms"] {
                assert!(registry.find(None, name).is_some(), "{kind} lacks {name}");
            }
        }
    }

    #[test]
    fn test_paint_only_on_shapes() {
        assert!(registry_for(FigureKind::Group).find(None, "fill").is_none());
        assert!(registry_for(FigureKind::Ellipse).find(None, "fill").is_some());
    }

    #[test]
    fn test_translate_is_composite() {
        let registry = registry_for(FigureKind::Rect);
        assert_eq!(
            registry.composite_names(),
            vec![QualifiedName::local("translate")]
        );
    }
}

//! Sibling combinator properties over random figure rows.

use drafter_css::{PseudoClassStates, parse_selector_group};
use drafter_figure::{FigureId, FigureKind, FigureSelectorModel, FigureTree};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

const SHAPES: &[FigureKind] = &[
    FigureKind::Rect,
    FigureKind::Ellipse,
    FigureKind::Line,
    FigureKind::Text,
];

/// The kinds of a row of shapes inside one layer.
#[derive(Debug, Clone)]
struct Row(Vec<FigureKind>);

impl Arbitrary for Row {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 8;
        Self((0..len).filter_map(|_| g.choose(SHAPES).copied()).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let kinds = self.0.clone();
        Box::new((0..kinds.len()).map(move |n| Self(kinds[..n].to_vec())))
    }
}

fn build(row: &Row) -> (FigureSelectorModel, Vec<FigureId>) {
    let mut tree = FigureTree::new();
    let layer = tree.add(FigureId::ROOT, FigureKind::Layer);
    let figures = row.0.iter().map(|&kind| tree.add(layer, kind)).collect();
    (FigureSelectorModel::new(tree), figures)
}

#[quickcheck]
fn general_sibling_is_superset_of_adjacent(row: Row) -> bool {
    let (model, figures) = build(&row);
    let states = PseudoClassStates::new();
    let adjacent = parse_selector_group("rect + ellipse");
    let general = parse_selector_group("rect ~ ellipse");
    figures.iter().all(|figure| {
        !adjacent.matches(&model, figure, &states) || general.matches(&model, figure, &states)
    })
}

#[quickcheck]
fn first_child_never_matches_adjacent(row: Row) -> bool {
    let (model, figures) = build(&row);
    let states = PseudoClassStates::new();
    let adjacent = parse_selector_group("* + *");
    figures
        .first()
        .is_none_or(|first| !adjacent.matches(&model, first, &states))
}

#[quickcheck]
fn universal_matches_everything(row: Row) -> bool {
    let (model, figures) = build(&row);
    let states = PseudoClassStates::new();
    let universal = parse_selector_group("*");
    figures.iter().all(|figure| {
        universal
            .match_element(&model, figure, &states)
            .is_some_and(|m| m.specificity.value() == 0)
    })
}

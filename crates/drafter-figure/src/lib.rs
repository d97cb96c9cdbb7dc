//! Figure trees styled by the Drafter CSS engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`FigureId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. [`FigureSelectorModel`] adapts it to
//! [`SelectorModel`](drafter_css::SelectorModel): figure kinds are the type
//! names selectors match, style classes and ids come from the figure, and
//! attribute selectors compare against the styled property values.
//!
//! ```text
//! drawing
//! └── layer.background
//!     ├── rect#frame
//!     └── group
//!         └── text
//! ```

/// Per-kind property registries.
pub mod properties;

/// Arena-based figure tree.
pub mod tree;

/// The selector model over figure trees.
pub mod model;

pub use model::FigureSelectorModel;
pub use properties::registry_for;
pub use tree::{Figure, FigureId, FigureKind, FigureTree};

//! CSS Cascading
//!
//! This module implements origin-layered style storage and stylesheet
//! application per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//!
//! Each element keeps one value per [`StyleOrigin`] and property. Reading a
//! property yields the value of the highest origin that has one, else the
//! property's initial value. Stylesheets write through
//! [`SelectorModel::set_attribute`](crate::model::SelectorModel::set_attribute).

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Stylesheet application and cascade ordering.
pub mod manager;
/// Property keys and the per-element-class key cache.
pub mod property;
/// Per-element origin layers, value interning and declaration application.
pub mod styled;

pub use manager::{MatchedDeclaration, StylesheetsManager, apply_inline_style};
pub use property::{PropertyCache, PropertyKey, PropertyRegistry};
pub use styled::{DeclaredValue, Interner, StyleMap, StyledProperty, apply_declaration};

/// [§ 6.2 Cascading Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// Ordered from lowest to highest precedence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum StyleOrigin {
    /// "The user agent's default style sheet"
    UserAgent,
    /// "The user may be able to specify style information for a particular document"
    User,
    /// "The author specifies style sheets for a source document"
    Author,
}

impl StyleOrigin {
    /// All origins, lowest precedence first.
    pub const ALL: [Self; 3] = [Self::UserAgent, Self::User, Self::Author];

    /// Slot index in an origin-layered array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::UserAgent => 0,
            Self::User => 1,
            Self::Author => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_order_and_names() {
        assert!(StyleOrigin::Author > StyleOrigin::User);
        assert!(StyleOrigin::User > StyleOrigin::UserAgent);
        assert_eq!(StyleOrigin::UserAgent.to_string(), "user-agent");
        assert_eq!("Author".parse::<StyleOrigin>().ok(), Some(StyleOrigin::Author));
    }
}

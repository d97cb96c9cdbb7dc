//! Deduplicated style-engine warnings.
//!
//! Stylesheets are applied to every figure in a drawing, so a single bad
//! declaration would otherwise be reported once per figure. Warnings are
//! remembered by message and forwarded to [`log::warn!`] the first time only.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (emitted once per unique message)
///
/// # Example
/// ```
/// drafter_common::warning::warn_once("CSS", "unknown property 'fil' skipped");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        log::warn!(target: "drafter", "[{component}] {message}");
    }
}

/// Returns true if the exact warning has already been emitted.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

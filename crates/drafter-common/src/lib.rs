//! Common utilities for the Drafter style engine.
//!
//! This crate provides shared infrastructure used by all Drafter components:
//! - **Warning System** - deduplicated diagnostics routed through the `log` facade

pub mod warning;

//! Snapshot module for sitewatch.
//!
//! Persists the last batch result as a flat JSON record list.

mod store;

pub use store::*;

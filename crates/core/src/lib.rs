//! Domain rules shared by every storefront crate.
//!
//! Nothing in here performs I/O: it holds the error vocabulary, id and
//! timestamp aliases, role names, object naming, catalog validation, the
//! fixed try-on generation parameters, and the webhook secret check.

pub mod catalog;
pub mod error;
pub mod hashing;
pub mod naming;
pub mod reveal;
pub mod roles;
pub mod tryon;
pub mod types;
pub mod webhook;

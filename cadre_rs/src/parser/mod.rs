//! Token classification, global-option extraction, and schema binding.
//!
//! One left-to-right scan model is shared by both consumers: the global
//! extraction pass (before command routing) and the per-command binder
//! (after it). [`tokens`] holds the classification rules so the two passes
//! can never disagree on what counts as an option.

pub(crate) mod binder;
pub(crate) mod globals;
pub(crate) mod tokens;

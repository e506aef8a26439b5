//! Command schema types: entries, argument/option specs, handlers, and the
//! per-invocation bound structures.
//!
//! A [`CommandEntry`] is the unit the registry stores and the matcher routes
//! to. Its [`ArgSpec`]/[`OptionSpec`] schemas drive the binder; its handler is
//! a type-erased callable so heterogeneous commands live in one table.

pub mod entry;
pub mod parsed;

pub use entry::{ArgSpec, CommandEntry, CommandMeta, Handler, OptionSpec};
pub use parsed::{ParsedArgs, ParsedOptions};

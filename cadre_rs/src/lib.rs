//! # cadre
//!
//! **Plugin-driven command dispatch for CLI applications.** Register a table
//! of commands and an ordered set of extension plugins; cadre parses argv,
//! routes it to the right handler, and runs a lifecycle of plugin hooks
//! around execution.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      User input (argv)                     │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Execution pipeline                     │
//! │                                                            │
//! │  pre-parse → global options → transforms → match           │
//! │      → post-parse → pre-execute → bind + execute           │
//! │      → post-execute → on-error chain                       │
//! │                                                            │
//! │  every phase fans out to capable plugins, priority order   │
//! └──────────────────────────────┬─────────────────────────────┘
//!                                │
//!                                ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │        Registry (immutable after build-time validation)    │
//! │   command table · plugin set · global options · matcher    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use cadre::{ArgSpec, Cli, CommandEntry, OptionSpec, Registry, Value, ValueKind};
//!
//! let registry = Registry::builder()
//!     .command(
//!         CommandEntry::new(&["greet"])
//!             .describe("Print a greeting")
//!             .arg(ArgSpec::required("name", ValueKind::Str))
//!             .option(
//!                 OptionSpec::new("count", ValueKind::Uint)
//!                     .short('c')
//!                     .default_value(Value::Uint(1)),
//!             )
//!             .handler(|args: &cadre::ParsedArgs, opts: &cadre::ParsedOptions, ctx: &mut cadre::ExecutionContext| {
//!                 for _ in 0..opts.get_uint("count").unwrap_or(1) {
//!                     ctx.say(&format!("hello, {}", args.get_str("name").unwrap_or("world")));
//!                 }
//!                 Ok(())
//!             }),
//!     )
//!     .plugin(cadre::HelpPlugin::new())
//!     .plugin(cadre::VersionPlugin::new("greeter", "0.1.0"))
//!     .build()
//!     .expect("invalid command table");
//!
//! let cli = Cli::new(registry);
//! let code = cli.execute(&["greet".into(), "--count".into(), "2".into(), "rust".into()]);
//! assert_eq!(code, 0);
//! ```
//!
//! # Design notes
//!
//! - The registry validates everything once, at build time: duplicate paths,
//!   group shapes, plugin command collisions, global-option collisions. A
//!   finished binary can never hit these at runtime.
//! - Longest registered path wins: `container run` beats `container` for
//!   the input `container run foo`, independent of registration order.
//! - `--help` and `--version` are not hard-coded; [`HelpPlugin`] and
//!   [`VersionPlugin`] contribute them as ordinary global options.
//! - One `execute` call is strictly synchronous. The registry is immutable
//!   and shareable; give each concurrent call its own [`ExecutionContext`].

pub mod command;
pub mod context;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod value;

mod matcher;
mod parser;
mod pipeline;

pub use command::{ArgSpec, CommandEntry, CommandMeta, Handler, OptionSpec, ParsedArgs, ParsedOptions};
pub use context::ExecutionContext;
pub use error::{CliError, RegistryError};
pub use pipeline::{Cli, Outcome};
pub use plugin::{
    Capability, ErrorDisposition, HelpPlugin, Plugin, PreExecuteAction, Transform, VersionPlugin,
    DEFAULT_PRIORITY,
};
pub use registry::{Registry, RegistryBuilder};
pub use value::{Value, ValueKind};

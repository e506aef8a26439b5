//! Command table entries and their argument/option schemas.

use crate::context::ExecutionContext;
use crate::error::CliError;
use crate::value::{Value, ValueKind};

use super::parsed::{ParsedArgs, ParsedOptions};

/// A command handler: the executable body of a [`CommandEntry`].
///
/// Implemented for any matching closure, so registration reads as
/// `.handler(|args, opts, ctx| { ... })`.
pub trait Handler: Send + Sync {
    fn run(
        &self,
        args: &ParsedArgs,
        options: &ParsedOptions,
        ctx: &mut ExecutionContext,
    ) -> Result<(), CliError>;
}

impl<F> Handler for F
where
    F: Fn(&ParsedArgs, &ParsedOptions, &mut ExecutionContext) -> Result<(), CliError>
        + Send
        + Sync,
{
    fn run(
        &self,
        args: &ParsedArgs,
        options: &ParsedOptions,
        ctx: &mut ExecutionContext,
    ) -> Result<(), CliError> {
        self(args, options, ctx)
    }
}

/// Declaration of one positional argument field.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    /// Field name, used in bound lookups and error messages.
    pub name: String,

    /// Declared type; tokens are coerced to this kind during binding.
    pub kind: ValueKind,

    /// Required fields with no positional token fail binding with
    /// `ArgumentMissingRequired`.
    pub required: bool,

    /// Bound when no positional token reaches this field.
    pub default: Option<Value>,

    /// Trailing sequence capturing all remaining positionals. A variadic
    /// field is never "missing"; with no tokens it binds an empty list.
    pub variadic: bool,
}

impl ArgSpec {
    /// A required positional field.
    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            variadic: false,
        }
    }

    /// An optional positional field; absent when omitted.
    pub fn optional(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: None,
            variadic: false,
        }
    }

    /// A trailing variadic field capturing all remaining positionals.
    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::StrList,
            required: false,
            default: None,
            variadic: true,
        }
    }

    /// Set a default bound when the field is omitted.
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }
}

/// Declaration of one named option field.
///
/// The same struct describes per-command options and plugin-contributed
/// global options.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    /// Long name, matched as `--name` or `--name=value`.
    pub name: String,

    /// Optional single-character short flag. Short flags are boolean-only:
    /// a value-taking option is reachable via its long form only.
    pub short: Option<char>,

    /// Declared type. `Bool` options never consume a following token;
    /// `StrList` options accumulate every occurrence.
    pub kind: ValueKind,

    /// Bound when the option is absent. Boolean options implicitly default
    /// to `false`; other kinds stay absent without a declared default.
    pub default: Option<Value>,

    /// One-line description for help output.
    pub description: String,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            short: None,
            kind,
            default: None,
            description: String::new(),
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Human-facing metadata attached to a command entry.
#[derive(Debug, Clone, Default)]
pub struct CommandMeta {
    /// One-line description shown in command lists.
    pub description: String,

    /// Example invocations.
    pub examples: Vec<String>,
}

/// One entry of the command table: a path, its schemas, and its handler.
///
/// Immutable once registered. An empty path designates the root command,
/// which receives the full token list when no other entry matches and the
/// input does not name a subcommand.
pub struct CommandEntry {
    /// Ordered, case-sensitive path segments, e.g. `["container", "run"]`.
    pub path: Vec<String>,

    /// Positional argument schema, in declaration order.
    pub args: Vec<ArgSpec>,

    /// Named option schema.
    pub options: Vec<OptionSpec>,

    /// Executable body; `None` reports `CommandNotImplemented` when invoked.
    pub handler: Option<Box<dyn Handler>>,

    /// Description and examples.
    pub meta: CommandMeta,
}

impl CommandEntry {
    /// Start an entry for the given path. An empty slice declares the root
    /// command.
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            args: Vec::new(),
            options: Vec::new(),
            handler: None,
            meta: CommandMeta::default(),
        }
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.args.push(spec);
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.meta.examples.push(example.into());
        self
    }

    /// The path joined for display, or `(root)` for the root command.
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            "(root)".to_string()
        } else {
            self.path.join(" ")
        }
    }

    /// Whether this entry is the designated root command.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Find a declared option by long name.
    pub(crate) fn option_by_name(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Find a declared option by short flag.
    pub(crate) fn option_by_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.short == Some(short))
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("path", &self.path)
            .field("args", &self.args)
            .field("options", &self.options)
            .field("handler", &self.handler.as_ref().map(|_| "..."))
            .field("meta", &self.meta)
            .finish()
    }
}

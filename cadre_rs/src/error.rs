//! Error types for registry construction and command invocation.
//!
//! The two enums are deliberately separate: [`RegistryError`] is a build-time
//! failure (a programming error in the command table or plugin set, fatal and
//! non-retryable), while [`CliError`] covers everything that can go wrong for
//! a single invocation and is what the `on_error` plugin chain sees.

use thiserror::Error;

use crate::value::ValueKind;

/// Per-invocation error taxonomy.
///
/// Errors keep their kind end to end: the `on_error` chain is offered the
/// original value, and when no plugin handles it the caller receives it
/// unchanged.
#[derive(Debug, Error)]
pub enum CliError {
    /// No registered command matched the input tokens.
    #[error("unknown command '{path}'")]
    CommandNotFound {
        /// The token (or joined tokens) that failed to resolve. Empty when
        /// the invocation had no tokens and no root command exists.
        path: String,
        /// The registered group prefix the input partially matched, if any.
        /// Help plugins use this to render group-scoped command lists.
        group: Option<Vec<String>>,
        /// A close registered command name, if one exists.
        suggestion: Option<String>,
    },

    /// A required positional argument was not supplied.
    #[error("missing required argument '{0}'")]
    ArgumentMissingRequired(String),

    /// More positional tokens than the command's schema declares.
    #[error("too many arguments: unexpected '{0}'")]
    ArgumentTooMany(String),

    /// A positional token failed coercion to its declared type.
    #[error("invalid value '{value}' for argument '{name}': expected {expected}")]
    ArgumentInvalidValue {
        name: String,
        value: String,
        expected: ValueKind,
    },

    /// An option token did not match any declared option.
    #[error("unknown option '{0}'")]
    OptionUnknown(String),

    /// A value-taking option had no value token to consume.
    #[error("option '{0}' requires a value")]
    OptionMissingValue(String),

    /// An option value failed coercion to its declared type.
    #[error("invalid value '{value}' for option '{name}': expected {expected}")]
    OptionInvalidValue {
        name: String,
        value: String,
        expected: ValueKind,
    },

    /// The matched command declares no executable body.
    #[error("command '{0}' is not implemented")]
    CommandNotImplemented(String),

    /// Application-level failure from a command handler, wrapped exactly once.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl CliError {
    /// Stable identifier for the error kind, used in the top-level message.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::CommandNotFound { .. } => "command-not-found",
            CliError::ArgumentMissingRequired(_) => "argument-missing",
            CliError::ArgumentTooMany(_) => "argument-too-many",
            CliError::ArgumentInvalidValue { .. } => "argument-invalid",
            CliError::OptionUnknown(_) => "option-unknown",
            CliError::OptionMissingValue(_) => "option-missing-value",
            CliError::OptionInvalidValue { .. } => "option-invalid",
            CliError::CommandNotImplemented(_) => "not-implemented",
            CliError::Handler(_) => "handler",
        }
    }

    /// Shorthand for a `CommandNotFound` with no group or suggestion.
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        CliError::CommandNotFound {
            path: path.into(),
            group: None,
            suggestion: None,
        }
    }
}

/// Build-time validation failure for a [`crate::Registry`].
///
/// These never reach the end user of a finished CLI: a production binary
/// builds its registry at startup and treats any of these as fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two commands were registered under the exact same path.
    #[error("duplicate command path '{0}'")]
    DuplicateCommandPath(String),

    /// A group command (its path is a strict prefix of another registered
    /// path) declares positional arguments.
    #[error("group command '{0}' declares positional arguments")]
    GroupWithPositionals(String),

    /// A plugin-contributed command collides with a core command or with
    /// another plugin's command.
    #[error("plugin '{plugin}' command '{path}' collides with an existing command")]
    PluginCommandCollision { plugin: String, path: String },

    /// Two plugins registered a global option with the same long name.
    #[error("global option '--{0}' registered more than once")]
    DuplicateGlobalOption(String),

    /// Two plugins registered a global option with the same short flag.
    #[error("global short flag '-{0}' registered more than once")]
    DuplicateGlobalShort(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_identifiers_are_stable() {
        assert_eq!(CliError::not_found("x").kind(), "command-not-found");
        assert_eq!(
            CliError::ArgumentMissingRequired("file".into()).kind(),
            "argument-missing"
        );
        assert_eq!(
            CliError::OptionMissingValue("count".into()).kind(),
            "option-missing-value"
        );
    }

    #[test]
    fn test_display_messages() {
        let err = CliError::OptionInvalidValue {
            name: "count".into(),
            value: "abc".into(),
            expected: ValueKind::Uint,
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'abc' for option 'count': expected unsigned integer"
        );

        let err = RegistryError::DuplicateCommandPath("container run".into());
        assert_eq!(err.to_string(), "duplicate command path 'container run'");
    }
}

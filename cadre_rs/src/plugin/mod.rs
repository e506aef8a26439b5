//! Plugin SPI: the trait extension plugins implement, plus the support types
//! hooks exchange with the pipeline.
//!
//! Hooks are plain synchronous methods with default no-op bodies. The
//! pipeline does not probe method presence; a plugin opts into a phase by
//! listing the matching [`Capability`], and phases with no capable plugin are
//! skipped entirely. Global-option handling needs no capability: a plugin
//! that returns specs from [`Plugin::global_options`] is called back for
//! exactly those options.

pub mod help;
pub mod version;

use crate::command::{CommandEntry, OptionSpec};
use crate::context::ExecutionContext;
use crate::error::CliError;
use crate::value::Value;

pub use help::HelpPlugin;
pub use version::VersionPlugin;

/// Default plugin priority. Higher priorities run first.
pub const DEFAULT_PRIORITY: i32 = 50;

/// One flag per hook a plugin can participate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    PreParse,
    TransformArgs,
    PostParse,
    PreExecute,
    PostExecute,
    OnError,
}

/// Result of a `transform_args` hook.
#[derive(Debug, Clone)]
pub struct Transform {
    /// The (possibly rewritten) token list.
    pub args: Vec<String>,

    /// Indices into `args` the pipeline must drop before the next plugin
    /// sees the list.
    pub consumed: Vec<usize>,

    /// When `false`, the invocation ends successfully right here: no later
    /// transform, no match, no execution.
    pub continue_processing: bool,
}

impl Transform {
    /// Pass the tokens through untouched.
    pub fn unchanged(args: Vec<String>) -> Self {
        Self {
            args,
            consumed: Vec::new(),
            continue_processing: true,
        }
    }

    /// Stop the invocation successfully without executing any command.
    pub fn halt(args: Vec<String>) -> Self {
        Self {
            args,
            consumed: Vec::new(),
            continue_processing: false,
        }
    }

    /// Mark an index of `args` as consumed.
    pub fn consume(mut self, index: usize) -> Self {
        self.consumed.push(index);
        self
    }
}

/// What a `pre_execute` hook decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreExecuteAction {
    /// Continue to binding and execution.
    Proceed,
    /// Skip the handler (and `post_execute`) and return success. Distinct
    /// from an error; used for help-on-request semantics.
    Veto,
}

/// What an `on_error` hook decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// The error is dealt with; propagation stops and the invocation
    /// reports success.
    Handled,
    /// Offer the error to the next plugin (or the caller).
    Unhandled,
}

/// An extension plugin.
///
/// Registered once at composition time; the registry sorts plugins by
/// descending [`Plugin::priority`] (stable, so equal priorities keep
/// registration order) and that order never changes at runtime.
pub trait Plugin: Send + Sync {
    /// Plugin name, used in validation errors and logs.
    fn name(&self) -> &str;

    /// Higher priorities run first in every phase.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// The hooks this plugin participates in.
    fn capabilities(&self) -> &[Capability] {
        &[]
    }

    /// Global options this plugin contributes. Long names and short flags
    /// must be unique across the whole plugin set; the registry build fails
    /// otherwise.
    fn global_options(&self) -> Vec<OptionSpec> {
        Vec::new()
    }

    /// Extra commands this plugin contributes to the table.
    fn commands(&self) -> Vec<CommandEntry> {
        Vec::new()
    }

    /// Rewrite the raw token list before anything else sees it.
    fn pre_parse(
        &self,
        _ctx: &mut ExecutionContext,
        args: Vec<String>,
    ) -> Result<Vec<String>, CliError> {
        Ok(args)
    }

    /// Called once for each of this plugin's global options consumed from
    /// the token list, with the coerced value.
    fn handle_global_option(
        &self,
        _ctx: &mut ExecutionContext,
        _name: &str,
        _value: &Value,
    ) -> Result<(), CliError> {
        Ok(())
    }

    /// Rewrite, consume, or short-circuit the remaining tokens.
    fn transform_args(
        &self,
        _ctx: &mut ExecutionContext,
        args: Vec<String>,
    ) -> Result<Transform, CliError> {
        Ok(Transform::unchanged(args))
    }

    /// Replace the matched command's positional-token view before binding.
    fn post_parse(
        &self,
        _ctx: &mut ExecutionContext,
        tokens: Vec<String>,
    ) -> Result<Vec<String>, CliError> {
        Ok(tokens)
    }

    /// Last chance to veto execution. `ctx.command_path()` names the matched
    /// command; `tokens` are its still-unbound remaining tokens.
    fn pre_execute(
        &self,
        _ctx: &mut ExecutionContext,
        _tokens: &[String],
    ) -> Result<PreExecuteAction, CliError> {
        Ok(PreExecuteAction::Proceed)
    }

    /// Notified after binding/execution, with the success flag, regardless
    /// of outcome.
    fn post_execute(&self, _ctx: &mut ExecutionContext, _success: bool) {}

    /// Offered match/bind/handler errors in priority order. Returning
    /// [`ErrorDisposition::Handled`] stops the chain and the invocation
    /// reports success.
    fn on_error(&self, _ctx: &mut ExecutionContext, _error: &CliError) -> ErrorDisposition {
        ErrorDisposition::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullPlugin;

    impl Plugin for NullPlugin {
        fn name(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn test_default_hooks_are_inert() {
        let plugin = NullPlugin;
        let mut ctx = ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()));

        assert_eq!(plugin.priority(), DEFAULT_PRIORITY);
        assert!(plugin.capabilities().is_empty());
        assert!(plugin.global_options().is_empty());

        let tokens = vec!["a".to_string()];
        let out = plugin.pre_parse(&mut ctx, tokens.clone()).unwrap();
        assert_eq!(out, tokens);

        let transform = plugin.transform_args(&mut ctx, tokens.clone()).unwrap();
        assert!(transform.continue_processing);
        assert!(transform.consumed.is_empty());
        assert_eq!(transform.args, tokens);

        assert_eq!(
            plugin.pre_execute(&mut ctx, &tokens).unwrap(),
            PreExecuteAction::Proceed
        );
        assert_eq!(
            plugin.on_error(&mut ctx, &CliError::not_found("x")),
            ErrorDisposition::Unhandled
        );
    }

    #[test]
    fn test_transform_builders() {
        let t = Transform::unchanged(vec!["a".into(), "b".into()]).consume(1);
        assert!(t.continue_processing);
        assert_eq!(t.consumed, vec![1]);

        let t = Transform::halt(Vec::new());
        assert!(!t.continue_processing);
    }
}

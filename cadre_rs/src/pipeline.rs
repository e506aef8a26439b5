//! The execution pipeline: drives the hook lifecycle around one invocation.
//!
//! Phase order is fixed: pre-parse, global-option extraction, argument
//! transforms, match, post-parse, pre-execute, bind + execute, post-execute,
//! and the on-error chain. A phase with no capable plugin is skipped. The
//! whole pipeline is synchronous; one `execute` call is one logical call.

use tracing::debug;

use crate::command::CommandEntry;
use crate::context::{ExecutionContext, KEY_COMMANDS};
use crate::error::CliError;
use crate::matcher::{self, MatchOutcome};
use crate::parser::{binder, globals};
use crate::plugin::{Capability, ErrorDisposition, PreExecuteAction};
use crate::registry::Registry;

/// How an invocation ended, for callers that want more than an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The matched handler ran to completion.
    Completed,
    /// A `transform_args` hook ended the invocation early
    /// (`continue_processing = false`).
    ShortCircuit,
    /// A `pre_execute` hook vetoed execution.
    Vetoed,
    /// An error occurred but an `on_error` hook handled it.
    ErrorHandled,
}

/// The dispatch engine: a validated registry plus the entry points that run
/// argv through it.
pub struct Cli {
    registry: Registry,
}

impl Cli {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run one invocation against a fresh context writing to the process
    /// stdio. Returns the process exit code: 0 on success (including
    /// short-circuit, veto, and handled-error paths), 1 otherwise.
    pub fn execute(&self, argv: &[String]) -> i32 {
        let mut ctx = ExecutionContext::new();
        self.execute_with(argv, &mut ctx)
    }

    /// Same as [`Cli::execute`] with a caller-supplied context; tests use
    /// this to capture output.
    pub fn execute_with(&self, argv: &[String], ctx: &mut ExecutionContext) -> i32 {
        match self.run(argv, ctx) {
            Ok(outcome) => {
                debug!(?outcome, "invocation finished");
                0
            }
            Err(err) => {
                ctx.warn(&format!("error[{}]: {}", err.kind(), err));
                if let CliError::CommandNotFound {
                    suggestion: Some(suggestion),
                    ..
                } = &err
                {
                    ctx.warn(&format!("did you mean '{}'?", suggestion));
                }
                1
            }
        }
    }

    /// Run the full lifecycle, returning the outcome or the unhandled error.
    pub fn run(&self, argv: &[String], ctx: &mut ExecutionContext) -> Result<Outcome, CliError> {
        let mut tokens: Vec<String> = argv.to_vec();

        // Command metadata for help-style plugins, published before any
        // hook runs.
        ctx.set(KEY_COMMANDS, self.registry.command_summaries());

        // Phase 1: PreParse. Plugin errors here propagate directly; the
        // on-error chain only sees match/bind/handler failures.
        if self.registry.has_capability(Capability::PreParse) {
            debug!("phase: pre-parse");
            for plugin in self.registry.capable(Capability::PreParse) {
                tokens = plugin.pre_parse(ctx, tokens)?;
            }
        }

        // Phase 2: global-option extraction.
        if self.registry.has_globals() {
            debug!("phase: global options");
            tokens = globals::extract(&self.registry, ctx, tokens)?;
        }

        // Phase 3: argument transforms, with early-termination support.
        if self.registry.has_capability(Capability::TransformArgs) {
            debug!("phase: transform args");
            for plugin in self.registry.capable(Capability::TransformArgs) {
                let transform = plugin.transform_args(ctx, tokens)?;
                tokens = apply_consumed(transform.args, transform.consumed);
                if !transform.continue_processing {
                    debug!(plugin = plugin.name(), "transform short-circuit");
                    return Ok(Outcome::ShortCircuit);
                }
            }
        }

        // Phase 4: match.
        let (entry, mut rest) = match matcher::match_tokens(&self.registry, &tokens) {
            MatchOutcome::Matched { index, rest } => (self.registry.entry(index), rest),
            // The root command receives the original token list, untouched.
            MatchOutcome::Root { index } => (self.registry.entry(index), tokens),
            MatchOutcome::NotFound(err) => return self.offer_error(ctx, err),
        };
        ctx.set_command_path(entry.path.clone());

        // Phase 5: PostParse.
        if self.registry.has_capability(Capability::PostParse) {
            debug!("phase: post-parse");
            for plugin in self.registry.capable(Capability::PostParse) {
                rest = plugin.post_parse(ctx, rest)?;
            }
        }

        // Phase 6: PreExecute; a veto returns success without binding,
        // executing, or notifying post-execute.
        if self.registry.has_capability(Capability::PreExecute) {
            debug!("phase: pre-execute");
            for plugin in self.registry.capable(Capability::PreExecute) {
                if plugin.pre_execute(ctx, &rest)? == PreExecuteAction::Veto {
                    debug!(plugin = plugin.name(), "execution vetoed");
                    return Ok(Outcome::Vetoed);
                }
            }
        }

        // Phase 7: bind + execute.
        debug!(command = %entry.display_path(), "phase: bind + execute");
        let result = bind_and_execute(entry, &rest, ctx);

        // Phase 8: PostExecute, notified of success or failure
        // unconditionally.
        if self.registry.has_capability(Capability::PostExecute) {
            debug!("phase: post-execute");
            for plugin in self.registry.capable(Capability::PostExecute) {
                plugin.post_execute(ctx, result.is_ok());
            }
        }

        // Phase 9: on-error chain for bind/handler failures.
        match result {
            Ok(()) => Ok(Outcome::Completed),
            Err(err) => self.offer_error(ctx, err),
        }
    }

    /// Offer an error to the on-error chain in priority order; the first
    /// plugin reporting `Handled` stops propagation.
    fn offer_error(&self, ctx: &mut ExecutionContext, err: CliError) -> Result<Outcome, CliError> {
        for plugin in self.registry.capable(Capability::OnError) {
            if plugin.on_error(ctx, &err) == ErrorDisposition::Handled {
                debug!(plugin = plugin.name(), kind = err.kind(), "error handled");
                return Ok(Outcome::ErrorHandled);
            }
        }
        Err(err)
    }
}

fn bind_and_execute(
    entry: &CommandEntry,
    tokens: &[String],
    ctx: &mut ExecutionContext,
) -> Result<(), CliError> {
    let (args, options) = binder::bind(entry, tokens)?;
    match &entry.handler {
        Some(handler) => handler.run(&args, &options, ctx),
        None => Err(CliError::CommandNotImplemented(entry.display_path())),
    }
}

/// Drop the indices a transform marked as consumed.
fn apply_consumed(args: Vec<String>, mut consumed: Vec<usize>) -> Vec<String> {
    if consumed.is_empty() {
        return args;
    }
    consumed.sort_unstable();
    consumed.dedup();
    args.into_iter()
        .enumerate()
        .filter(|(i, _)| consumed.binary_search(i).is_err())
        .map(|(_, token)| token)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ArgSpec, CommandEntry};
    use crate::plugin::{Plugin, Transform};
    use crate::value::ValueKind;
    use serde_json::json;

    fn toks(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()))
    }

    /// Marks its hook invocations in the context store.
    struct TracingPlugin {
        name: &'static str,
        priority: i32,
        caps: Vec<Capability>,
        halt_in_transform: bool,
        handle_errors: bool,
    }

    impl TracingPlugin {
        fn new(name: &'static str, priority: i32, caps: &[Capability]) -> Self {
            Self {
                name,
                priority,
                caps: caps.to_vec(),
                halt_in_transform: false,
                handle_errors: false,
            }
        }
    }

    impl Plugin for TracingPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn capabilities(&self) -> &[Capability] {
            &self.caps
        }

        fn transform_args(
            &self,
            ctx: &mut ExecutionContext,
            args: Vec<String>,
        ) -> Result<Transform, CliError> {
            ctx.push_trace("calls", &format!("{}:transform", self.name));
            if self.halt_in_transform {
                Ok(Transform::halt(args))
            } else {
                Ok(Transform::unchanged(args))
            }
        }

        fn post_execute(&self, ctx: &mut ExecutionContext, success: bool) {
            ctx.push_trace("calls", &format!("{}:post:{}", self.name, success));
        }

        fn on_error(&self, ctx: &mut ExecutionContext, error: &CliError) -> ErrorDisposition {
            ctx.push_trace("calls", &format!("{}:on_error:{}", self.name, error.kind()));
            if self.handle_errors {
                ErrorDisposition::Handled
            } else {
                ErrorDisposition::Unhandled
            }
        }
    }

    fn run_entry() -> CommandEntry {
        CommandEntry::new(&["run"])
            .arg(ArgSpec::required("file", ValueKind::Str))
            .handler(
                |args: &crate::command::ParsedArgs,
                 _opts: &crate::command::ParsedOptions,
                 ctx: &mut ExecutionContext| {
                    let file = args.get_str("file").unwrap_or_default().to_string();
                    ctx.push_trace("calls", &format!("handler:{}", file));
                    Ok(())
                },
            )
    }

    #[test]
    fn test_completed_run() {
        let cli = Cli::new(Registry::builder().command(run_entry()).build().unwrap());
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["run", "a.txt"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(ctx.get("calls"), Some(&json!(["handler:a.txt"])));
        assert_eq!(ctx.command_path(), ["run"]);
    }

    #[test]
    fn test_transform_short_circuit_skips_lower_priority_and_execution() {
        let mut high = TracingPlugin::new("high", 90, &[Capability::TransformArgs]);
        high.halt_in_transform = true;
        let low = TracingPlugin::new("low", 10, &[Capability::TransformArgs]);

        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(high)
                .plugin(low)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["run", "a.txt"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::ShortCircuit);
        // Only the high-priority transform ran; no handler, no post-execute.
        assert_eq!(ctx.get("calls"), Some(&json!(["high:transform"])));

        // And the exit code is still success.
        let mut ctx2 = self::ctx();
        assert_eq!(cli.execute_with(&toks(&["run", "a.txt"]), &mut ctx2), 0);
    }

    #[test]
    fn test_post_execute_notified_on_success_and_failure() {
        let observer = TracingPlugin::new("obs", 50, &[Capability::PostExecute]);
        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(observer)
                .build()
                .unwrap(),
        );

        let mut ctx = ctx();
        cli.run(&toks(&["run", "a.txt"]), &mut ctx).unwrap();
        assert_eq!(
            ctx.get("calls"),
            Some(&json!(["handler:a.txt", "obs:post:true"]))
        );

        // Missing required argument: bind fails, post-execute still fires.
        let mut ctx = self::ctx();
        let err = cli.run(&toks(&["run"]), &mut ctx).unwrap_err();
        assert!(matches!(err, CliError::ArgumentMissingRequired(_)));
        assert_eq!(ctx.get("calls"), Some(&json!(["obs:post:false"])));
    }

    #[test]
    fn test_on_error_chain_stops_at_first_handled() {
        let mut high = TracingPlugin::new("high", 90, &[Capability::OnError]);
        high.handle_errors = true;
        let low = TracingPlugin::new("low", 10, &[Capability::OnError]);

        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(high)
                .plugin(low)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["run"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::ErrorHandled);
        assert_eq!(
            ctx.get("calls"),
            Some(&json!(["high:on_error:argument-missing"]))
        );
    }

    #[test]
    fn test_unhandled_error_propagates_unchanged() {
        let low = TracingPlugin::new("low", 10, &[Capability::OnError]);
        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(low)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let err = cli.run(&toks(&["run"]), &mut ctx).unwrap_err();
        assert!(matches!(err, CliError::ArgumentMissingRequired(name) if name == "file"));
    }

    #[test]
    fn test_command_not_found_goes_through_error_chain() {
        let mut handler = TracingPlugin::new("help", 90, &[Capability::OnError]);
        handler.handle_errors = true;
        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(handler)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["bogus"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::ErrorHandled);
    }

    #[test]
    fn test_pre_parse_rewrites_tokens_before_matching() {
        struct Expand;
        impl Plugin for Expand {
            fn name(&self) -> &str {
                "expand"
            }
            fn capabilities(&self) -> &[Capability] {
                &[Capability::PreParse]
            }
            fn pre_parse(
                &self,
                _ctx: &mut ExecutionContext,
                args: Vec<String>,
            ) -> Result<Vec<String>, CliError> {
                Ok(args
                    .into_iter()
                    .map(|t| if t == "r" { "run".to_string() } else { t })
                    .collect())
            }
        }

        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(Expand)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["r", "a.txt"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(ctx.get("calls"), Some(&json!(["handler:a.txt"])));
        assert_eq!(ctx.command_path(), ["run"]);
    }

    #[test]
    fn test_post_parse_replaces_token_view_before_binding() {
        struct Swap;
        impl Plugin for Swap {
            fn name(&self) -> &str {
                "swap"
            }
            fn capabilities(&self) -> &[Capability] {
                &[Capability::PostParse]
            }
            fn post_parse(
                &self,
                _ctx: &mut ExecutionContext,
                _tokens: Vec<String>,
            ) -> Result<Vec<String>, CliError> {
                Ok(vec!["swapped.txt".to_string()])
            }
        }

        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(Swap)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let outcome = cli.run(&toks(&["run", "orig.txt"]), &mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Completed);
        // The handler bound the replaced view, not the matched leftovers.
        assert_eq!(ctx.get("calls"), Some(&json!(["handler:swapped.txt"])));
    }

    #[test]
    fn test_failing_hook_bypasses_error_chain() {
        // A failing hook propagates directly; the on_error chain sees only
        // match/bind/handler errors.
        struct Broken;
        impl Plugin for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn capabilities(&self) -> &[Capability] {
                &[Capability::PreParse]
            }
            fn pre_parse(
                &self,
                _ctx: &mut ExecutionContext,
                _args: Vec<String>,
            ) -> Result<Vec<String>, CliError> {
                Err(CliError::OptionUnknown("--broken".into()))
            }
        }

        let mut catcher = TracingPlugin::new("catch", 10, &[Capability::OnError]);
        catcher.handle_errors = true;

        let cli = Cli::new(
            Registry::builder()
                .command(run_entry())
                .plugin(Broken)
                .plugin(catcher)
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let err = cli.run(&toks(&["run", "a.txt"]), &mut ctx).unwrap_err();
        assert!(matches!(err, CliError::OptionUnknown(name) if name == "--broken"));
        // on_error was never offered the failure.
        assert!(ctx.get("calls").is_none());
    }

    #[test]
    fn test_not_implemented_command() {
        let cli = Cli::new(
            Registry::builder()
                .command(CommandEntry::new(&["stub"]))
                .build()
                .unwrap(),
        );
        let mut ctx = ctx();
        let err = cli.run(&toks(&["stub"]), &mut ctx).unwrap_err();
        assert!(matches!(err, CliError::CommandNotImplemented(path) if path == "stub"));
    }

    #[test]
    fn test_exit_codes() {
        let cli = Cli::new(Registry::builder().command(run_entry()).build().unwrap());
        let mut ctx = ctx();
        assert_eq!(cli.execute_with(&toks(&["run", "a.txt"]), &mut ctx), 0);
        let mut ctx = self::ctx();
        assert_eq!(cli.execute_with(&toks(&["run"]), &mut ctx), 1);
    }

    #[test]
    fn test_apply_consumed() {
        let args = toks(&["a", "b", "c", "d"]);
        assert_eq!(apply_consumed(args.clone(), vec![]), args);
        assert_eq!(apply_consumed(args.clone(), vec![1, 3]), toks(&["a", "c"]));
        assert_eq!(apply_consumed(args, vec![3, 1, 1]), toks(&["a", "c"]));
    }

    #[test]
    fn test_transform_idempotence() {
        // Re-running the transform chain over its own output produces the
        // same tokens when no plugin depends on call count.
        struct Rewrite;
        impl Plugin for Rewrite {
            fn name(&self) -> &str {
                "rewrite"
            }
            fn capabilities(&self) -> &[Capability] {
                &[Capability::TransformArgs]
            }
            fn transform_args(
                &self,
                _ctx: &mut ExecutionContext,
                args: Vec<String>,
            ) -> Result<Transform, CliError> {
                let rewritten = args
                    .into_iter()
                    .map(|t| if t == "alias" { "run".to_string() } else { t })
                    .collect();
                Ok(Transform::unchanged(rewritten))
            }
        }

        let plugin = Rewrite;
        let mut ctx = ctx();
        let once = plugin
            .transform_args(&mut ctx, toks(&["alias", "a.txt"]))
            .unwrap();
        let twice = plugin.transform_args(&mut ctx, once.args.clone()).unwrap();
        assert_eq!(once.args, twice.args);
    }
}

//! Built-in help plugin.
//!
//! `--help`/`-h` is not special-cased by the engine: this plugin contributes
//! it as an ordinary global option, records the request in the context
//! store, and vetoes execution to render a command listing instead. It also
//! claims `CommandNotFound` errors for the root and for recognized group
//! prefixes, turning them into group help with a success exit.

use serde_json::Value as JsonValue;

use crate::command::OptionSpec;
use crate::context::{ExecutionContext, KEY_COMMANDS};
use crate::error::CliError;
use crate::value::{Value, ValueKind};

use super::{Capability, ErrorDisposition, Plugin, PreExecuteAction};

/// Context flag set when `--help` was consumed.
pub const KEY_HELP_REQUESTED: &str = "cadre.help_requested";

/// Contributes `--help/-h` and renders minimal command listings.
#[derive(Debug, Default)]
pub struct HelpPlugin;

impl HelpPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Render one line per command, optionally filtered to a path prefix.
    fn render_commands(ctx: &mut ExecutionContext, prefix: &[String]) {
        let Some(commands) = ctx.get(KEY_COMMANDS).cloned() else {
            return;
        };
        let JsonValue::Array(commands) = commands else {
            return;
        };

        ctx.say("Commands:");
        for command in &commands {
            let path: Vec<&str> = command["path"]
                .as_array()
                .map(|segments| segments.iter().filter_map(JsonValue::as_str).collect())
                .unwrap_or_default();
            if path.is_empty() {
                continue;
            }
            if !prefix.is_empty()
                && !path
                    .iter()
                    .zip(prefix.iter())
                    .take(prefix.len())
                    .all(|(a, b)| *a == b)
            {
                continue;
            }
            if path.len() < prefix.len() {
                continue;
            }
            let description = command["description"].as_str().unwrap_or_default();
            ctx.say(&format!("  {:<24} {}", path.join(" "), description));
        }
    }
}

impl Plugin for HelpPlugin {
    fn name(&self) -> &str {
        "help"
    }

    /// Runs ahead of application plugins so help requests win.
    fn priority(&self) -> i32 {
        100
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::PreExecute, Capability::OnError]
    }

    fn global_options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("help", ValueKind::Bool)
            .short('h')
            .describe("Show help for commands")]
    }

    fn handle_global_option(
        &self,
        ctx: &mut ExecutionContext,
        name: &str,
        value: &Value,
    ) -> Result<(), CliError> {
        if name == "help" && value.as_bool() == Some(true) {
            ctx.set_flag(KEY_HELP_REQUESTED);
        }
        Ok(())
    }

    fn pre_execute(
        &self,
        ctx: &mut ExecutionContext,
        _tokens: &[String],
    ) -> Result<PreExecuteAction, CliError> {
        if !ctx.flag(KEY_HELP_REQUESTED) {
            return Ok(PreExecuteAction::Proceed);
        }
        let prefix = ctx.command_path().to_vec();
        Self::render_commands(ctx, &prefix);
        Ok(PreExecuteAction::Veto)
    }

    fn on_error(&self, ctx: &mut ExecutionContext, error: &CliError) -> ErrorDisposition {
        let CliError::CommandNotFound { path, group, .. } = error else {
            return ErrorDisposition::Unhandled;
        };

        // Group prefix: render the group's commands and absorb the error.
        if let Some(group) = group {
            ctx.warn(&format!("unknown command '{}'", path));
            let prefix = group.clone();
            Self::render_commands(ctx, &prefix);
            return ErrorDisposition::Handled;
        }

        // Bare invocation with no root command: render top-level help.
        if path.is_empty() {
            Self::render_commands(ctx, &[]);
            return ErrorDisposition::Handled;
        }

        // A genuinely unknown command stays an error.
        ErrorDisposition::Unhandled
    }
}

//! Built-in version plugin.
//!
//! Contributes `--version/-V` as an ordinary global option and vetoes
//! execution to print `name version` instead.

use crate::command::OptionSpec;
use crate::context::ExecutionContext;
use crate::error::CliError;
use crate::value::{Value, ValueKind};

use super::{Capability, Plugin, PreExecuteAction};

/// Context flag set when `--version` was consumed.
pub const KEY_VERSION_REQUESTED: &str = "cadre.version_requested";

/// Prints the binary name and version on `--version/-V`.
#[derive(Debug)]
pub struct VersionPlugin {
    name: String,
    version: String,
}

impl VersionPlugin {
    /// Typically `VersionPlugin::new("mytool", env!("CARGO_PKG_VERSION"))`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Plugin for VersionPlugin {
    fn name(&self) -> &str {
        "version"
    }

    /// Just below the help plugin, ahead of application plugins.
    fn priority(&self) -> i32 {
        95
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::PreExecute]
    }

    fn global_options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("version", ValueKind::Bool)
            .short('V')
            .describe("Show version")]
    }

    fn handle_global_option(
        &self,
        ctx: &mut ExecutionContext,
        name: &str,
        value: &Value,
    ) -> Result<(), CliError> {
        if name == "version" && value.as_bool() == Some(true) {
            ctx.set_flag(KEY_VERSION_REQUESTED);
        }
        Ok(())
    }

    fn pre_execute(
        &self,
        ctx: &mut ExecutionContext,
        _tokens: &[String],
    ) -> Result<PreExecuteAction, CliError> {
        if !ctx.flag(KEY_VERSION_REQUESTED) {
            return Ok(PreExecuteAction::Proceed);
        }
        ctx.say(&format!("{} {}", self.name, self.version));
        Ok(PreExecuteAction::Veto)
    }
}

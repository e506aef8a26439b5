//! Command/plugin registry: accumulation, validation, and the immutable
//! result the pipeline runs against.
//!
//! Validation happens once, in [`RegistryBuilder::build`], and any violation
//! fails the whole build. A production binary builds its registry at process
//! startup and treats a [`RegistryError`] as fatal: it is a programming
//! error in the command table or plugin set, not a runtime condition. After
//! `build()` the registry never changes; it holds no interior mutability and
//! can be shared read-only across threads.

use serde::Serialize;
use tracing::debug;

use crate::command::{CommandEntry, OptionSpec};
use crate::error::RegistryError;
use crate::plugin::{Capability, Plugin};

/// Entry shape published to help-style plugins through the execution
/// context.
#[derive(Serialize)]
struct CommandSummary<'a> {
    path: &'a [String],
    description: &'a str,
}

/// The immutable, validated command table and plugin set.
pub struct Registry {
    commands: Vec<CommandEntry>,
    /// Indices of non-root entries, sorted by descending path length so the
    /// matcher's first hit is the longest prefix.
    match_order: Vec<usize>,
    root: Option<usize>,
    /// Plugins sorted by descending priority; equal priorities keep
    /// registration order.
    plugins: Vec<Box<dyn Plugin>>,
    /// Global options in plugin order, each with its owning plugin's index.
    globals: Vec<(usize, OptionSpec)>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.commands
    }

    pub(crate) fn entry(&self, index: usize) -> &CommandEntry {
        &self.commands[index]
    }

    pub(crate) fn match_order(&self) -> &[usize] {
        &self.match_order
    }

    pub(crate) fn root_index(&self) -> Option<usize> {
        self.root
    }

    pub fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    pub(crate) fn plugin(&self, index: usize) -> &dyn Plugin {
        self.plugins[index].as_ref()
    }

    /// Plugins declaring the capability, in priority order.
    pub(crate) fn capable(&self, cap: Capability) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins
            .iter()
            .filter(move |p| p.capabilities().contains(&cap))
            .map(|p| p.as_ref())
    }

    /// Whether any plugin declares the capability; phases with no capable
    /// plugin are skipped entirely.
    pub(crate) fn has_capability(&self, cap: Capability) -> bool {
        self.plugins
            .iter()
            .any(|p| p.capabilities().contains(&cap))
    }

    pub(crate) fn has_globals(&self) -> bool {
        !self.globals.is_empty()
    }

    pub(crate) fn find_global(&self, name: &str) -> Option<(usize, &OptionSpec)> {
        self.globals
            .iter()
            .find(|(_, spec)| spec.name == name)
            .map(|(owner, spec)| (*owner, spec))
    }

    pub(crate) fn find_global_short(&self, short: char) -> Option<(usize, &OptionSpec)> {
        self.globals
            .iter()
            .find(|(_, spec)| spec.short == Some(short))
            .map(|(owner, spec)| (*owner, spec))
    }

    /// Command metadata as JSON, in registration order: an array of
    /// `{path, description}` objects. The pipeline publishes this in the
    /// execution context for help-style plugins.
    pub(crate) fn command_summaries(&self) -> serde_json::Value {
        let summaries: Vec<CommandSummary<'_>> = self
            .commands
            .iter()
            .map(|entry| CommandSummary {
                path: &entry.path,
                description: &entry.meta.description,
            })
            .collect();
        serde_json::to_value(summaries).unwrap_or_default()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands.len())
            .field("plugins", &self.plugins.len())
            .field("globals", &self.globals.len())
            .finish()
    }
}

/// Accumulates command and plugin registrations, then validates and builds.
#[derive(Default)]
pub struct RegistryBuilder {
    commands: Vec<CommandEntry>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl RegistryBuilder {
    /// Register a core command.
    pub fn command(mut self, entry: CommandEntry) -> Self {
        self.commands.push(entry);
        self
    }

    /// Register a plugin. Registration order is the tie-break for equal
    /// priorities.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Validate every invariant and produce the immutable registry.
    pub fn build(mut self) -> Result<Registry, RegistryError> {
        // Pass 1: duplicate core command paths (exact equality, not prefix).
        for (i, entry) in self.commands.iter().enumerate() {
            for other in &self.commands[i + 1..] {
                if entry.path == other.path {
                    return Err(RegistryError::DuplicateCommandPath(entry.display_path()));
                }
            }
        }

        // Stable priority sort; from here on plugin indices refer to this
        // order.
        self.plugins
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));

        // Pass 2 runs over the merged table below, so plugin-contributed
        // commands participate in group-shape checking too.

        // Pass 3: plugin-contributed commands must not collide with core
        // commands or each other.
        let mut commands = self.commands;
        for plugin in &self.plugins {
            for entry in plugin.commands() {
                if commands.iter().any(|c| c.path == entry.path) {
                    return Err(RegistryError::PluginCommandCollision {
                        plugin: plugin.name().to_string(),
                        path: entry.display_path(),
                    });
                }
                commands.push(entry);
            }
        }

        // Pass 2: a group command (its path strictly extended by another
        // entry) must declare no positional arguments. The root command is
        // exempt: it is a routing fallback, not a group, and may take args.
        for entry in &commands {
            if entry.is_root() || entry.args.is_empty() {
                continue;
            }
            let is_group = commands.iter().any(|other| {
                other.path.len() > entry.path.len()
                    && other.path[..entry.path.len()] == entry.path[..]
            });
            if is_group {
                return Err(RegistryError::GroupWithPositionals(entry.display_path()));
            }
        }

        // Pass 4: global option long names and short flags must be unique
        // across the whole plugin set.
        let mut globals: Vec<(usize, OptionSpec)> = Vec::new();
        for (owner, plugin) in self.plugins.iter().enumerate() {
            for spec in plugin.global_options() {
                if globals.iter().any(|(_, g)| g.name == spec.name) {
                    return Err(RegistryError::DuplicateGlobalOption(spec.name));
                }
                if let Some(short) = spec.short {
                    if globals.iter().any(|(_, g)| g.short == Some(short)) {
                        return Err(RegistryError::DuplicateGlobalShort(short));
                    }
                }
                globals.push((owner, spec));
            }
        }

        let root = commands.iter().position(CommandEntry::is_root);
        let mut match_order: Vec<usize> = (0..commands.len())
            .filter(|&i| !commands[i].is_root())
            .collect();
        match_order.sort_by_key(|&i| std::cmp::Reverse(commands[i].path.len()));

        debug!(
            commands = commands.len(),
            plugins = self.plugins.len(),
            globals = globals.len(),
            "registry built"
        );

        Ok(Registry {
            commands,
            match_order,
            root,
            plugins: self.plugins,
            globals,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

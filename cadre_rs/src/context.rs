//! Per-invocation execution context.
//!
//! One [`ExecutionContext`] is created for each top-level `execute(argv)`
//! call and threaded mutably through every pipeline phase. It owns the I/O
//! handles, the accumulated command path, and a string-keyed store plugins
//! use to pass state between hook phases (e.g. "help requested"). It is
//! dropped, together with everything it owns, when the call returns.

use std::collections::HashMap;
use std::io::Write;

use serde_json::Value as JsonValue;

/// Context store key under which the pipeline publishes command metadata
/// (a JSON array of `{path, description}` objects) before the first phase.
/// Help-style plugins read it to render command lists.
pub const KEY_COMMANDS: &str = "cadre.commands";

/// The single mutable object threaded through every pipeline phase.
pub struct ExecutionContext {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    command_path: Vec<String>,
    data: HashMap<String, JsonValue>,
}

impl ExecutionContext {
    /// Context writing to the process stdout/stderr.
    pub fn new() -> Self {
        Self::with_io(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    /// Context writing to injected handles. Tests use this to capture output.
    pub fn with_io(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            err,
            command_path: Vec::new(),
            data: HashMap::new(),
        }
    }

    // ========================================================================
    // I/O
    // ========================================================================

    /// Raw access to the output stream.
    pub fn out(&mut self) -> &mut (dyn Write + Send) {
        &mut *self.out
    }

    /// Raw access to the error stream.
    pub fn err(&mut self) -> &mut (dyn Write + Send) {
        &mut *self.err
    }

    /// Write a line to the output stream. Write failures are swallowed; a
    /// broken stdout is not an invocation error.
    pub fn say(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
    }

    /// Write a line to the error stream.
    pub fn warn(&mut self, line: &str) {
        let _ = writeln!(self.err, "{}", line);
    }

    // ========================================================================
    // Command path
    // ========================================================================

    /// The matched command path; empty before the match phase.
    pub fn command_path(&self) -> &[String] {
        &self.command_path
    }

    pub(crate) fn set_command_path(&mut self, path: Vec<String>) {
        self.command_path = path;
    }

    // ========================================================================
    // Plugin data store
    // ========================================================================

    /// Store a value under a string key for later phases.
    pub fn set(&mut self, key: impl Into<String>, value: JsonValue) {
        self.data.insert(key.into(), value);
    }

    /// Read a value stored by an earlier phase.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.data.get(key)
    }

    /// Remove and return a stored value.
    pub fn take(&mut self, key: &str) -> Option<JsonValue> {
        self.data.remove(key)
    }

    /// Store `true` under the key.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.data.insert(key.into(), JsonValue::Bool(true));
    }

    /// Whether a flag key reads as `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.data.get(key), Some(JsonValue::Bool(true)))
    }

    /// Append a string to a list-valued key, creating it on first use.
    /// Plugins use this to record call order across hook phases.
    pub fn push_trace(&mut self, key: &str, item: &str) {
        let entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        if let JsonValue::Array(items) = entry {
            items.push(JsonValue::String(item.to_string()));
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_roundtrip() {
        let mut ctx = ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()));
        ctx.set("key", json!({"n": 1}));
        assert_eq!(ctx.get("key"), Some(&json!({"n": 1})));
        assert_eq!(ctx.take("key"), Some(json!({"n": 1})));
        assert!(ctx.get("key").is_none());
    }

    #[test]
    fn test_flags() {
        let mut ctx = ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()));
        assert!(!ctx.flag("requested"));
        ctx.set_flag("requested");
        assert!(ctx.flag("requested"));
    }

    #[test]
    fn test_push_trace_accumulates_in_order() {
        let mut ctx = ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()));
        ctx.push_trace("calls", "first");
        ctx.push_trace("calls", "second");
        assert_eq!(ctx.get("calls"), Some(&json!(["first", "second"])));
    }
}

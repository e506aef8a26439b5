//! Bound per-invocation argument and option values.
//!
//! Both structures are ephemeral: the binder produces them, the handler reads
//! them, and they are dropped (with any heap-allocated lists) when the
//! invocation completes.

use std::collections::HashMap;

use crate::value::Value;

/// Positional argument values bound against a command's [`crate::ArgSpec`]
/// schema, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    values: HashMap<String, Value>,
}

impl ParsedArgs {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// The bound value for a field, or `None` for an omitted optional field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_uint)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// The captured list for a variadic field (empty when no tokens reached
    /// it, never `None` for a declared variadic).
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named option values bound against a command's [`crate::OptionSpec`]
/// schema, keyed by long name.
#[derive(Debug, Clone, Default)]
pub struct ParsedOptions {
    values: HashMap<String, Value>,
}

impl ParsedOptions {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    /// The bound value, or `None` for an absent option with no default.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Boolean options read as `false` when absent.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_uint)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Accumulated occurrences of a repeatable option, in encounter order.
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_args_accessors() {
        let mut args = ParsedArgs::default();
        args.insert("file", Value::Str("a.txt".into()));
        args.insert("count", Value::Uint(3));

        assert_eq!(args.get_str("file"), Some("a.txt"));
        assert_eq!(args.get_uint("count"), Some(3));
        assert_eq!(args.get_str("count"), None);
        assert!(args.get("missing").is_none());
    }

    #[test]
    fn test_parsed_options_bool_default() {
        let mut opts = ParsedOptions::default();
        opts.insert("verbose", Value::Bool(true));

        assert!(opts.get_bool("verbose"));
        assert!(!opts.get_bool("quiet"));
    }

    #[test]
    fn test_parsed_options_list() {
        let mut opts = ParsedOptions::default();
        opts.insert("files", Value::StrList(vec!["a".into(), "b".into()]));

        assert_eq!(
            opts.get_list("files"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
    }
}

//! Global-option extraction: the scan that runs before command routing.
//!
//! Consumes tokens matching plugin-registered global options and calls the
//! owning plugin's `handle_global_option` with the coerced value. Everything
//! else (unknown options, positionals, the `--` terminator and anything
//! after it) is left in place for the matcher and binder.

use tracing::debug;

use crate::context::ExecutionContext;
use crate::error::CliError;
use crate::registry::Registry;
use crate::value::{Value, ValueKind};

use super::tokens;

/// Scan `tokens` for registered global options, consume the matches, and
/// return the remaining tokens.
///
/// Long options follow the binder's rules (`--name`, `--name=value`, value
/// in the next token for non-boolean kinds unless that token looks like an
/// option). Short flags are boolean-only; a short cluster is consumed only
/// when every character resolves to a registered global short, so mixed
/// clusters stay intact for the command's own parser.
pub(crate) fn extract(
    registry: &Registry,
    ctx: &mut ExecutionContext,
    tokens: Vec<String>,
) -> Result<Vec<String>, CliError> {
    let mut remaining: Vec<String> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token == tokens::TERMINATOR {
            // Positional mode for the rest of the invocation; the binder
            // consumes the terminator itself.
            remaining.push(token);
            remaining.extend(iter);
            break;
        }

        if let Some((name, inline)) = tokens::split_long(&token) {
            if let Some((owner, spec)) = registry.find_global(name) {
                let value = match (spec.kind, inline) {
                    (_, Some(raw)) => coerce_global(spec.kind, name, raw)?,
                    (ValueKind::Bool, None) => Value::Bool(true),
                    (kind, None) => {
                        // Value lives in the next token unless that token
                        // itself looks like an option.
                        match iter.peek() {
                            Some(next) if !tokens::is_option_like(next) => {
                                let raw = iter.next().unwrap_or_default();
                                coerce_global(kind, name, &raw)?
                            }
                            _ => return Err(CliError::OptionMissingValue(name.to_string())),
                        }
                    }
                };
                debug!(option = name, plugin = registry.plugin(owner).name(), "global option consumed");
                registry.plugin(owner).handle_global_option(ctx, name, &value)?;
                continue;
            }
            remaining.push(token);
            continue;
        }

        let cluster: Option<Vec<char>> = tokens::short_cluster(&token).map(Iterator::collect);
        if let Some(shorts) = cluster {
            let all_global = shorts
                .iter()
                .all(|&c| registry.find_global_short(c).is_some());
            if all_global {
                for c in shorts {
                    if let Some((owner, spec)) = registry.find_global_short(c) {
                        debug!(option = %spec.name, short = %c, "global short consumed");
                        registry
                            .plugin(owner)
                            .handle_global_option(ctx, &spec.name, &Value::Bool(true))?;
                    }
                }
                continue;
            }
            remaining.push(token);
            continue;
        }

        remaining.push(token);
    }

    Ok(remaining)
}

fn coerce_global(kind: ValueKind, name: &str, raw: &str) -> Result<Value, CliError> {
    Value::coerce(kind, raw).ok_or_else(|| CliError::OptionInvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
        expected: kind,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::OptionSpec;
    use crate::plugin::Plugin;
    use crate::registry::Registry;
    use serde_json::json;

    /// Records every global option delivered to it in the context store.
    struct RecorderPlugin;

    impl Plugin for RecorderPlugin {
        fn name(&self) -> &str {
            "recorder"
        }

        fn global_options(&self) -> Vec<OptionSpec> {
            vec![
                OptionSpec::new("verbose", ValueKind::Bool).short('v'),
                OptionSpec::new("quiet", ValueKind::Bool).short('q'),
                OptionSpec::new("level", ValueKind::Uint),
                OptionSpec::new("mode", ValueKind::Str),
            ]
        }

        fn handle_global_option(
            &self,
            ctx: &mut ExecutionContext,
            name: &str,
            value: &Value,
        ) -> Result<(), CliError> {
            ctx.push_trace("seen", &format!("{}={:?}", name, value));
            Ok(())
        }
    }

    fn registry() -> Registry {
        Registry::builder().plugin(RecorderPlugin).build().unwrap()
    }

    fn ctx() -> ExecutionContext {
        ExecutionContext::with_io(Box::new(Vec::new()), Box::new(Vec::new()))
    }

    fn run(tokens: &[&str]) -> (Vec<String>, ExecutionContext) {
        let registry = registry();
        let mut ctx = ctx();
        let tokens: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        let rest = extract(&registry, &mut ctx, tokens).unwrap();
        (rest, ctx)
    }

    #[test]
    fn test_bool_presence_without_value() {
        let (rest, ctx) = run(&["--verbose", "scan"]);
        assert_eq!(rest, vec!["scan"]);
        assert_eq!(ctx.get("seen"), Some(&json!(["verbose=Bool(true)"])));
    }

    #[test]
    fn test_value_in_next_token() {
        let (rest, ctx) = run(&["--level", "3", "scan"]);
        assert_eq!(rest, vec!["scan"]);
        assert_eq!(ctx.get("seen"), Some(&json!(["level=Uint(3)"])));
    }

    #[test]
    fn test_inline_value() {
        let (rest, ctx) = run(&["--mode=fast"]);
        assert!(rest.is_empty());
        assert_eq!(ctx.get("seen"), Some(&json!(["mode=Str(\"fast\")"])));
    }

    #[test]
    fn test_option_shaped_next_token_is_not_a_value() {
        let registry = registry();
        let mut ctx = ctx();
        let err = extract(
            &registry,
            &mut ctx,
            vec!["--level".into(), "--verbose".into()],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::OptionMissingValue(name) if name == "level"));
    }

    #[test]
    fn test_negative_number_consumed_as_value() {
        // -3 has the negative-number shape, so it does not look like an
        // option and is taken as the value.
        let registry = registry();
        let mut ctx = ctx();
        let rest = extract(&registry, &mut ctx, vec!["--mode".into(), "-3".into()]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(ctx.get("seen"), Some(&json!(["mode=Str(\"-3\")"])));
    }

    #[test]
    fn test_invalid_value() {
        let registry = registry();
        let mut ctx = ctx();
        let err = extract(&registry, &mut ctx, vec!["--level=abc".into()]).unwrap_err();
        assert!(matches!(err, CliError::OptionInvalidValue { name, .. } if name == "level"));
    }

    #[test]
    fn test_bundled_shorts() {
        let (rest, ctx) = run(&["-vq", "scan"]);
        assert_eq!(rest, vec!["scan"]);
        assert_eq!(
            ctx.get("seen"),
            Some(&json!(["verbose=Bool(true)", "quiet=Bool(true)"]))
        );
    }

    #[test]
    fn test_mixed_cluster_left_for_command_parser() {
        // 'x' is not a registered global short, so the whole cluster stays.
        let (rest, ctx) = run(&["-vx"]);
        assert_eq!(rest, vec!["-vx"]);
        assert!(ctx.get("seen").is_none());
    }

    #[test]
    fn test_unknown_long_left_in_place() {
        let (rest, _ctx) = run(&["--filter", "a"]);
        assert_eq!(rest, vec!["--filter", "a"]);
    }

    #[test]
    fn test_terminator_stops_extraction() {
        let (rest, ctx) = run(&["--", "--verbose"]);
        assert_eq!(rest, vec!["--", "--verbose"]);
        assert!(ctx.get("seen").is_none());
    }
}

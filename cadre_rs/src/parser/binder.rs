//! Schema binder: turns a command's remaining tokens into typed
//! [`ParsedArgs`] and [`ParsedOptions`].
//!
//! Classification and binding happen in one left-to-right scan followed by a
//! positional-assignment pass. Exactly one error is reported per invocation;
//! the scan stops at the first failure.

use crate::command::{CommandEntry, OptionSpec, ParsedArgs, ParsedOptions};
use crate::error::CliError;
use crate::value::{Value, ValueKind};

use super::tokens;

/// Bind `input` against the entry's declared schemas.
pub(crate) fn bind(
    entry: &CommandEntry,
    input: &[String],
) -> Result<(ParsedArgs, ParsedOptions), CliError> {
    let mut positionals: Vec<&str> = Vec::new();
    let mut options = ParsedOptions::default();
    let mut positional_only = false;

    let mut i = 0;
    while i < input.len() {
        let token = input[i].as_str();
        i += 1;

        if !positional_only && token == tokens::TERMINATOR {
            positional_only = true;
            continue;
        }

        if positional_only || !tokens::is_option_like(token) {
            positionals.push(token);
            continue;
        }

        if let Some((name, inline)) = tokens::split_long(token) {
            let spec = entry
                .option_by_name(name)
                .ok_or_else(|| CliError::OptionUnknown(format!("--{}", name)))?;
            let raw = match (spec.kind, inline) {
                (_, Some(raw)) => Some(raw),
                (ValueKind::Bool, None) => None,
                (_, None) => {
                    // Consume the next token as the value unless it looks
                    // like an option.
                    match input.get(i) {
                        Some(next) if !tokens::is_option_like(next) => {
                            i += 1;
                            Some(input[i - 1].as_str())
                        }
                        _ => return Err(CliError::OptionMissingValue(name.to_string())),
                    }
                }
            };
            bind_option(&mut options, spec, raw)?;
            continue;
        }

        if let Some(cluster) = tokens::short_cluster(token) {
            for c in cluster {
                let spec = entry
                    .option_by_short(c)
                    .ok_or_else(|| CliError::OptionUnknown(format!("-{}", c)))?;
                // Short flags are boolean-only; a value-taking option has to
                // be spelled out long.
                if spec.kind != ValueKind::Bool {
                    return Err(CliError::OptionMissingValue(spec.name.clone()));
                }
                options.insert(spec.name.clone(), Value::Bool(true));
            }
            continue;
        }

        positionals.push(token);
    }

    fill_option_defaults(&mut options, &entry.options);
    let args = bind_positionals(entry, &positionals)?;
    Ok((args, options))
}

/// Bind one occurrence of an option to its coerced value. List kinds
/// accumulate; scalar kinds keep the last occurrence.
fn bind_option(
    options: &mut ParsedOptions,
    spec: &OptionSpec,
    raw: Option<&str>,
) -> Result<(), CliError> {
    let value = match raw {
        None => Value::Bool(true),
        Some(raw) => Value::coerce(spec.kind, raw).ok_or_else(|| CliError::OptionInvalidValue {
            name: spec.name.clone(),
            value: raw.to_string(),
            expected: spec.kind,
        })?,
    };

    if spec.kind == ValueKind::StrList {
        if let Some(Value::StrList(existing)) = options.get_mut(&spec.name) {
            if let Value::StrList(mut items) = value {
                existing.append(&mut items);
            }
            return Ok(());
        }
    }
    options.insert(spec.name.clone(), value);
    Ok(())
}

/// Fill declared defaults for absent options; booleans default to `false`.
fn fill_option_defaults(options: &mut ParsedOptions, specs: &[OptionSpec]) {
    for spec in specs {
        if options.contains(&spec.name) {
            continue;
        }
        if let Some(default) = &spec.default {
            options.insert(spec.name.clone(), default.clone());
        } else if spec.kind == ValueKind::Bool {
            options.insert(spec.name.clone(), Value::Bool(false));
        }
        // Other kinds without a default stay absent; defaulting them is the
        // command author's responsibility.
    }
}

/// Assign collected positional tokens to the entry's argument fields in
/// declaration order.
fn bind_positionals(entry: &CommandEntry, positionals: &[&str]) -> Result<ParsedArgs, CliError> {
    let mut args = ParsedArgs::default();
    let mut next = 0;

    for spec in &entry.args {
        if spec.variadic {
            let rest: Vec<String> = positionals[next..].iter().map(|s| s.to_string()).collect();
            next = positionals.len();
            args.insert(spec.name.clone(), Value::StrList(rest));
            continue;
        }

        if next < positionals.len() {
            let raw = positionals[next];
            next += 1;
            let value =
                Value::coerce(spec.kind, raw).ok_or_else(|| CliError::ArgumentInvalidValue {
                    name: spec.name.clone(),
                    value: raw.to_string(),
                    expected: spec.kind,
                })?;
            args.insert(spec.name.clone(), value);
        } else if let Some(default) = &spec.default {
            args.insert(spec.name.clone(), default.clone());
        } else if spec.required {
            return Err(CliError::ArgumentMissingRequired(spec.name.clone()));
        }
        // Omitted optional field: stays absent.
    }

    if next < positionals.len() {
        let leftover = positionals[next];
        // A command with no positional schema that still received a
        // non-option token is an unrecognized subcommand, not excess input.
        if entry.args.is_empty() {
            return Err(CliError::not_found(leftover));
        }
        return Err(CliError::ArgumentTooMany(leftover.to_string()));
    }

    Ok(args)
}

// ============================================================================
// Tests
// ============================================================================

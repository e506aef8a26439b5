//! Longest-prefix command matching.
//!
//! The registry pre-sorts its match table by descending path length, so the
//! first entry whose path segments equal the leading input tokens is the
//! most specific match ("container run" beats "container" for
//! `container run foo`). Root routing and group-prefix detection handle the
//! no-match cases.

use tracing::debug;

use crate::error::CliError;
use crate::registry::Registry;

/// Outcome of the match phase.
#[derive(Debug)]
pub(crate) enum MatchOutcome {
    /// An entry matched; `rest` holds the tokens after its path.
    Matched { index: usize, rest: Vec<String> },
    /// Nothing matched but the input does not name a subcommand; route the
    /// root command with the original token list.
    Root { index: usize },
    /// No route; carries the `CommandNotFound` for the error-hook chain.
    NotFound(CliError),
}

/// Resolve `tokens` against the registry's command table.
pub(crate) fn match_tokens(registry: &Registry, tokens: &[String]) -> MatchOutcome {
    // Longest path first; the root (empty path) is handled separately so it
    // cannot shadow unknown-subcommand detection.
    for &index in registry.match_order() {
        let path = &registry.entry(index).path;
        if path.len() <= tokens.len() && path.iter().eq(tokens.iter().take(path.len())) {
            debug!(path = %registry.entry(index).display_path(), "command matched");
            return MatchOutcome::Matched {
                index,
                rest: tokens[path.len()..].to_vec(),
            };
        }
    }

    // No named command: empty input or option-first input goes to the root
    // command (when one exists) with the token list untouched.
    if tokens.first().is_none_or(|t| t.starts_with('-')) {
        if let Some(index) = registry.root_index() {
            debug!("routing to root command");
            return MatchOutcome::Root { index };
        }
        // Synthesized so error-hook plugins get a chance to render
        // top-level help.
        return MatchOutcome::NotFound(CliError::not_found(
            tokens.first().cloned().unwrap_or_default(),
        ));
    }

    // Partial group match: "container bogus" when only "container run" is
    // registered. The group path travels with the error as a hook point for
    // group-help rendering.
    if let Some(group) = longest_group_prefix(registry, tokens) {
        let attempted = tokens[..=group.len().min(tokens.len() - 1)].join(" ");
        debug!(group = group.join(" "), "unmatched tokens under group prefix");
        return MatchOutcome::NotFound(CliError::CommandNotFound {
            path: attempted,
            group: Some(group),
            suggestion: None,
        });
    }

    MatchOutcome::NotFound(CliError::CommandNotFound {
        path: tokens[0].clone(),
        group: None,
        suggestion: suggest_similar(registry, &tokens[0]),
    })
}

/// The longest strict prefix of a registered path that the leading tokens
/// match, of length >= 1.
fn longest_group_prefix(registry: &Registry, tokens: &[String]) -> Option<Vec<String>> {
    let mut best: Option<&[String]> = None;
    for entry in registry.entries() {
        let path = &entry.path;
        for k in (1..path.len()).rev() {
            if k > tokens.len() {
                continue;
            }
            if path[..k].iter().eq(tokens.iter().take(k))
                && best.is_none_or(|b| k > b.len())
            {
                best = Some(&path[..k]);
            }
        }
    }
    best.map(|b| b.to_vec())
}

/// Suggest a similar command name using Levenshtein distance.
/// Returns `Some` if a close match is found (distance <= 2).
fn suggest_similar(registry: &Registry, input: &str) -> Option<String> {
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for entry in registry.entries() {
        let Some(first) = entry.path.first() else {
            continue;
        };
        let distance = strsim::levenshtein(&input_lower, first);
        if distance <= 2 && best.is_none_or(|(_, d)| distance < d) {
            best = Some((first, distance));
        }
    }

    best.map(|(name, _)| name.to_string())
}

// ============================================================================
// Tests
// ============================================================================

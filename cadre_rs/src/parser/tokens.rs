//! Token classification rules.
//!
//! A token is an option token when it begins with `-`, unless it has the
//! negative-number shape (`-` immediately followed by a digit) or is a lone
//! `-` (conventionally a positional naming stdin). The literal `--` is a
//! terminator handled by each scan, not an option.

/// The positional-mode terminator.
pub(crate) const TERMINATOR: &str = "--";

/// Whether a token is parsed as an option (long or short cluster).
pub(crate) fn is_option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_negative_number(token) && token != TERMINATOR
}

/// The negative-number shape: `-` immediately followed by a digit.
/// Such tokens are positional, never options.
pub(crate) fn is_negative_number(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Split a long option token into `(name, inline_value)`.
/// Returns `None` when the token is not a long option.
pub(crate) fn split_long(token: &str) -> Option<(&str, Option<&str>)> {
    let rest = token.strip_prefix("--")?;
    if rest.is_empty() {
        return None;
    }
    match rest.split_once('=') {
        Some((name, value)) => Some((name, Some(value))),
        None => Some((rest, None)),
    }
}

/// The characters of a short-option cluster (`-abc` -> `a`, `b`, `c`).
/// Returns `None` when the token is not a short cluster.
pub(crate) fn short_cluster(token: &str) -> Option<impl Iterator<Item = char> + '_> {
    if !is_option_like(token) || token.starts_with("--") {
        return None;
    }
    Some(token[1..].chars())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_option_like() {
        assert!(is_option_like("--count"));
        assert!(is_option_like("--count=5"));
        assert!(is_option_like("-v"));
        assert!(is_option_like("-xyz"));

        assert!(!is_option_like("file.txt"));
        assert!(!is_option_like("-5"));
        assert!(!is_option_like("-42abc"));
        assert!(!is_option_like("-"));
        assert!(!is_option_like("--"));
        assert!(!is_option_like(""));
    }

    #[test]
    fn test_is_negative_number() {
        assert!(is_negative_number("-5"));
        assert!(is_negative_number("-42"));
        assert!(is_negative_number("-1.5"));
        assert!(!is_negative_number("-v"));
        assert!(!is_negative_number("5"));
        assert!(!is_negative_number("-"));
    }

    #[test]
    fn test_split_long() {
        assert_eq!(split_long("--count"), Some(("count", None)));
        assert_eq!(split_long("--count=5"), Some(("count", Some("5"))));
        assert_eq!(split_long("--name="), Some(("name", Some(""))));
        assert_eq!(split_long("-v"), None);
        assert_eq!(split_long("--"), None);
        assert_eq!(split_long("file"), None);
    }

    #[test]
    fn test_short_cluster() {
        let chars: Vec<char> = short_cluster("-xyz").unwrap().collect();
        assert_eq!(chars, vec!['x', 'y', 'z']);
        assert!(short_cluster("--count").is_none());
        assert!(short_cluster("-5").is_none());
        assert!(short_cluster("file").is_none());
    }
}

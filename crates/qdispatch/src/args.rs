//! Minimal key/value command-line argument parser.
//!
//! Recognizes a long prefix `--`, a short prefix `-`, and a `key=value`
//! separator `=`. Names are case-insensitive; when a flag repeats, the last
//! occurrence wins.

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct ParsedArg {
    has_value: bool,
    value: String,
}

/// A parsed view of `std::env::args()` (or any string slice, for testing).
#[derive(Debug, Clone, Default)]
pub struct Args {
    entries: HashMap<String, ParsedArg>,
}

fn split_prefix(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .filter(|rest| !rest.is_empty())
}

fn parse_token(token: &str) -> Option<(String, ParsedArg)> {
    let rest = split_prefix(token)?;
    match rest.split_once('=') {
        Some((name, value)) if !name.is_empty() => Some((
            name.to_lowercase(),
            ParsedArg {
                has_value: true,
                value: value.to_string(),
            },
        )),
        Some(_) => None,
        None => Some((
            rest.to_lowercase(),
            ParsedArg {
                has_value: false,
                value: String::new(),
            },
        )),
    }
}

impl Args {
    /// Parse the process's own `argv`, skipping `argv[0]`.
    pub fn from_env() -> Self {
        Self::from_tokens(std::env::args().skip(1))
    }

    /// Parse an arbitrary sequence of tokens (primarily for tests).
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();
        for token in tokens {
            if let Some((name, parsed)) = parse_token(token.as_ref()) {
                entries.insert(name, parsed);
            }
        }
        Args { entries }
    }

    /// Does `name` appear at all (with or without a value)?
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Does `name` appear with a `key=value` value attached?
    pub fn value_exists(&self, name: &str) -> bool {
        self.entries
            .get(&name.to_lowercase())
            .is_some_and(|a| a.has_value)
    }

    /// Fetch `name`'s value as a string.
    pub fn value_as_string(&self, name: &str) -> Option<String> {
        self.entries
            .get(&name.to_lowercase())
            .filter(|a| a.has_value)
            .map(|a| a.value.clone())
    }

    /// Fetch `name`'s value parsed as `usize`.
    pub fn value_as_uint(&self, name: &str) -> Option<usize> {
        self.value_as_string(name)?.parse().ok()
    }

    /// Fetch `name`'s value parsed as `isize`.
    pub fn value_as_int(&self, name: &str) -> Option<isize> {
        self.value_as_string(name)?.parse().ok()
    }

    /// Fetch `name`'s value parsed as `f64`.
    pub fn value_as_float(&self, name: &str) -> Option<f64> {
        self.value_as_string(name)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_and_short_prefixes_both_recognized() {
        let args = Args::from_tokens(["--test-vectors", "-tf"]);
        assert!(args.exists("test-vectors"));
        assert!(args.exists("tf"));
        assert!(!args.exists("nope"));
    }

    #[test]
    fn key_value_pairs_parse() {
        let args = Args::from_tokens(["--num-threads=12"]);
        assert!(args.value_exists("num-threads"));
        assert_eq!(args.value_as_uint("num-threads"), Some(12));
    }

    #[test]
    fn names_are_case_insensitive() {
        let args = Args::from_tokens(["--Num-Threads=8"]);
        assert_eq!(args.value_as_uint("num-threads"), Some(8));
        assert_eq!(args.value_as_uint("NUM-THREADS"), Some(8));
    }

    #[test]
    fn last_occurrence_wins() {
        let args = Args::from_tokens(["-j=4", "-j=9"]);
        assert_eq!(args.value_as_uint("j"), Some(9));
    }

    #[test]
    fn flag_with_no_value_has_no_value() {
        let args = Args::from_tokens(["--test-malloc"]);
        assert!(args.exists("test-malloc"));
        assert!(!args.value_exists("test-malloc"));
        assert_eq!(args.value_as_string("test-malloc"), None);
    }

    #[test]
    fn float_and_int_values_parse() {
        let args = Args::from_tokens(["--ratio=0.5", "--offset=-3"]);
        assert_eq!(args.value_as_float("ratio"), Some(0.5));
        assert_eq!(args.value_as_int("offset"), Some(-3));
    }

    #[test]
    fn bad_value_fails_to_parse() {
        let args = Args::from_tokens(["--num-threads=abc"]);
        assert_eq!(args.value_as_uint("num-threads"), None);
    }
}

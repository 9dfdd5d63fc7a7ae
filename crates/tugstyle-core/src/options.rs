//! Rule option bags.
//!
//! A [`RuleOptions`] holds the raw `property` values of one configured
//! module. Typed accessors parse them the way Checkstyle does, falling back
//! to the caller's default whenever a value is absent or malformed. Nothing
//! here fails: a bad option never stops a rule from running.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use regex::Regex;
use tracing::warn;

/// Raw option values of one configured rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    values: BTreeMap<String, String>,
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Boolean option. Only `true`, in any case, is true.
    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// Integer option; unparsable values give the default.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Regex option. A pattern that does not compile is logged and the
    /// default pattern is used instead.
    pub fn regex(&self, key: &str, default: &Regex) -> Regex {
        self.optional_regex(key).unwrap_or_else(|| default.clone())
    }

    /// Regex option without a default.
    pub fn optional_regex(&self, key: &str) -> Option<Regex> {
        let pattern = self.get(key)?;
        match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(option = key, pattern, error = %err, "ignoring malformed pattern");
                None
            }
        }
    }

    /// The `tokens` option as a set.
    ///
    /// The value is split on commas with surrounding whitespace and each
    /// part is parsed as `T`. Unknown tokens are dropped. Without a
    /// `tokens` option the default set is returned.
    pub fn tokens<T>(&self, default: impl IntoIterator<Item = T>) -> BTreeSet<T>
    where
        T: FromStr + Ord,
    {
        match self.get("tokens") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter_map(|token| token.parse().ok())
                .collect(),
            None => default.into_iter().collect(),
        }
    }

    /// The `option` value parsed as `T`, case-insensitively.
    ///
    /// `T::from_str` is handed the upper-cased value.
    pub fn option<T: FromStr>(&self, default: T) -> T {
        self.get("option")
            .and_then(|value| value.trim().to_ascii_uppercase().parse().ok())
            .unwrap_or(default)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = RuleOptions::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Token {
        Plus,
        Minus,
    }

    impl FromStr for Token {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "PLUS" => Ok(Token::Plus),
                "MINUS" => Ok(Token::Minus),
                _ => Err(()),
            }
        }
    }

    #[derive(Debug, PartialEq)]
    enum Pad {
        Space,
        NoSpace,
    }

    impl FromStr for Pad {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "SPACE" => Ok(Pad::Space),
                "NOSPACE" => Ok(Pad::NoSpace),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn test_bool_parsing() {
        let options = RuleOptions::new()
            .with("a", "TRUE")
            .with("b", "yes")
            .with("c", "false");
        assert!(options.bool("a", false));
        assert!(!options.bool("b", true));
        assert!(!options.bool("c", true));
        assert!(options.bool("missing", true));
    }

    #[test]
    fn test_regex_fallback() {
        let default = Regex::new("^x$").unwrap();
        let options = RuleOptions::new().with("good", "^y+$").with("bad", "(");
        assert!(options.regex("good", &default).is_match("yyy"));
        assert_eq!(options.regex("bad", &default).as_str(), "^x$");
        assert_eq!(options.regex("missing", &default).as_str(), "^x$");
        assert!(options.optional_regex("bad").is_none());
    }

    #[test]
    fn test_tokens() {
        let options = RuleOptions::new().with("tokens", "PLUS ,  BOGUS,MINUS");
        let tokens = options.tokens([Token::Plus]);
        assert_eq!(tokens.into_iter().collect::<Vec<_>>(), vec![Token::Plus, Token::Minus]);

        let defaults = RuleOptions::new().tokens([Token::Minus]);
        assert_eq!(defaults.into_iter().collect::<Vec<_>>(), vec![Token::Minus]);
    }

    #[test]
    fn test_option_is_case_insensitive() {
        assert_eq!(RuleOptions::new().with("option", "space").option(Pad::NoSpace), Pad::Space);
        assert_eq!(RuleOptions::new().with("option", "NoSpace").option(Pad::Space), Pad::NoSpace);
        assert_eq!(RuleOptions::new().with("option", "wide").option(Pad::NoSpace), Pad::NoSpace);
        assert_eq!(RuleOptions::new().option(Pad::Space), Pad::Space);
    }

    #[test]
    fn test_int() {
        let options = RuleOptions::new().with("n", " 12 ").with("bad", "x");
        assert_eq!(options.int("n", 0), 12);
        assert_eq!(options.int("bad", 3), 3);
    }
}

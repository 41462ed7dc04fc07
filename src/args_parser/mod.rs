//! Script argument parsing
//!
//! Scripts take a deliberately small grammar:
//!
//! ```text
//! helper-scripts publish keyless --branch=master --projectPaths[]=/a,/b --snapshot
//! ```
//!
//! - `keyless` - a positional value, collected under [`ArgsParser::DEFAULT_KEY`]
//! - `--key=value` - a string value
//! - `--key[]=v1,v2` - a list value, comma separated
//! - `--key` - a boolean flag
//!
//! Parsing never fails. Anything that is not an option is positional.


/// A single parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    List(Vec<String>),
    Flag(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ArgValue::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ArgValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

/// Parsed arguments in first-seen key order.
///
/// A key is present only if it was supplied; the parser injects no defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgStore {
    entries: Vec<(String, ArgValue)>,
}

impl ArgStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value of `key`. A single-element list is accepted as well.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ArgValue::Str(value) => Some(value),
            ArgValue::List(values) if values.len() == 1 => Some(&values[0]),
            _ => None,
        }
    }

    /// String value of `key`, `None` when absent or empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|value| !value.trim().is_empty())
    }

    /// List value of `key`. A plain string is treated as a one-element list.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            ArgValue::List(values) => Some(values.clone()),
            ArgValue::Str(value) => Some(vec![value.clone()]),
            ArgValue::Flag(_) => None,
        }
    }

    /// Whether the boolean flag `key` was given.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(ArgValue::Flag(true)))
    }

    /// Positional tokens, in original order.
    pub fn positional(&self) -> &[String] {
        self.get(ArgsParser::DEFAULT_KEY)
            .and_then(ArgValue::as_list)
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tokenizer for the script argument grammar.
pub struct ArgsParser;

impl ArgsParser {
    /// Bucket key for positional values.
    pub const DEFAULT_KEY: &'static str = "_";

    const KEY_PREFIX: char = '-';
    const EXPRESSION_SIGN: char = '=';
    const LIST_TYPE_KEY: &'static str = "[]";
    const LIST_VALUE_SEPARATOR: char = ',';

    /// Parse raw tokens into an [`ArgStore`].
    ///
    /// Tokens are applied left to right, so a repeated key keeps its last value.
    pub fn parse<I, S>(raw_args: I) -> ArgStore
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = ArgStore::new();
        let mut keyless = Vec::new();
        let mut options = Vec::new();

        for arg in raw_args {
            let arg = arg.as_ref();
            match Self::classify(arg) {
                Some(option) => options.push(option),
                None => keyless.push(arg.to_string()),
            }
        }

        if !keyless.is_empty() {
            store.insert(Self::DEFAULT_KEY, ArgValue::List(keyless));
        }

        for (key, value) in options {
            store.insert(key, value);
        }

        store
    }

    /// Classify a single token, `None` for positional values.
    fn classify(arg: &str) -> Option<(String, ArgValue)> {
        if !arg.starts_with(Self::KEY_PREFIX) {
            return None;
        }

        let Some((raw_key, raw_value)) = arg.split_once(Self::EXPRESSION_SIGN) else {
            let key = Self::key_from_raw(arg)?;
            return Some((key, ArgValue::Flag(true)));
        };

        let key = Self::key_from_raw(raw_key)?;
        let value = if raw_key.ends_with(Self::LIST_TYPE_KEY) {
            ArgValue::List(Self::split_list(raw_value))
        } else {
            ArgValue::Str(raw_value.to_string())
        };

        Some((key, value))
    }

    /// Strip leading dashes and the list suffix. A key that ends up empty
    /// (`-`, `--`, `--=x`) makes the token positional.
    fn key_from_raw(raw_key: &str) -> Option<String> {
        let key = raw_key.trim_start_matches(Self::KEY_PREFIX);
        let key = key.strip_suffix(Self::LIST_TYPE_KEY).unwrap_or(key);
        (!key.is_empty()).then(|| key.to_string())
    }

    fn split_list(raw_value: &str) -> Vec<String> {
        if raw_value.is_empty() {
            return Vec::new();
        }
        raw_value
            .split(Self::LIST_VALUE_SEPARATOR)
            .map(str::to_string)
            .collect()
    }
}

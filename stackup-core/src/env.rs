//! Environment - An immutable snapshot of environment variables

use std::collections::BTreeMap;

/// Snapshot of environment variables, ordered by name
///
/// Resolution never touches the real process environment. It reads from a
/// snapshot and produces a new, layered snapshot instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Look up a variable, treating an empty value as unset
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up a variable or fall back to a default
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Set a variable, overwriting any existing value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Environment::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Iterate over all variables in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let env = Environment::new().with("region", "");
        assert_eq!(env.get("region"), None);
        assert_eq!(env.get_or("region", "us-east-1"), "us-east-1");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let env = Environment::new().with("region", "eu-west-1");
        assert_eq!(env.get("region"), Some("eu-west-1"));
        assert_eq!(env.get("REGION"), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut env = Environment::new().with("region", "us-east-1");
        env.set("region", "us-west-2");
        assert_eq!(env.get("region"), Some("us-west-2"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_new_is_empty() {
        assert!(Environment::new().is_empty());
        assert!(!Environment::new().with("region", "us-east-1").is_empty());
    }

    #[test]
    fn test_iter_is_sorted() {
        let env: Environment = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let names: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

use std::fmt;

/// Dotted path into a form tree: `"address.street"` is `["address", "street"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(pub Vec<String>);

impl KeyPath {
    pub fn from_slice(parts: &[&str]) -> Self {
        KeyPath(parts.iter().map(|s| s.to_string()).collect())
    }

    /// Split a dotted string. The empty string yields an empty path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return KeyPath::default();
        }
        KeyPath(path.split('.').map(str::to_string).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First segment and the remainder, or `None` for an empty path.
    pub fn split_first(&self) -> Option<(&str, &[String])> {
        self.0.split_first().map(|(head, rest)| (head.as_str(), rest))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(value: &str) -> Self {
        KeyPath::parse(value)
    }
}

impl From<String> for KeyPath {
    fn from(value: String) -> Self {
        KeyPath::parse(&value)
    }
}

impl From<&[&str]> for KeyPath {
    fn from(value: &[&str]) -> Self {
        KeyPath::from_slice(value)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(value: [&str; N]) -> Self {
        KeyPath::from_slice(&value)
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(value: Vec<String>) -> Self {
        KeyPath(value)
    }
}

impl From<&KeyPath> for KeyPath {
    fn from(value: &KeyPath) -> Self {
        value.clone()
    }
}

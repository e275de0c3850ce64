use serde::{Deserialize, Serialize};
use std::collections::btree_map::{IntoIter, Iter};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A single option value handed to an inner driver.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringList(Vec<String>),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::StringList(list) => Some(list),
            _ => None,
        }
    }
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(b) => Display::fmt(b, f),
            OptionValue::Int(i) => Display::fmt(i, f),
            OptionValue::String(s) => Display::fmt(s, f),
            OptionValue::StringList(list) => write!(f, "[{}]", list.join(", ")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::String(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::String(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(list: Vec<String>) -> Self {
        OptionValue::StringList(list)
    }
}

/// A flat mapping from option (flag) name to value. This is the bag a caller hands to a driver's
/// configuration entry point, and also the shape of flavor and provider defaults.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverOptions {
    values: BTreeMap<String, OptionValue>,
}

impl DriverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<OptionValue>
    where
        K: Into<String>,
        V: Into<OptionValue>,
    {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, OptionValue> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    /// Copy every entry of `other` into `self`, replacing values for keys that already exist.
    pub fn overlay(&mut self, other: &DriverOptions) {
        for (key, value) in other.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// The value of `key` if it is a string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    /// The value of `key` if it is an integer.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(OptionValue::as_int)
    }

    /// The value of `key` if it is a boolean. An absent key reads as `false`.
    pub fn bool(&self, key: &str) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    /// The value of `key` if it is a list of strings.
    pub fn string_slice(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(OptionValue::as_string_list)
    }

    pub fn into_inner(self) -> BTreeMap<String, OptionValue> {
        self.values
    }
}

impl From<BTreeMap<String, OptionValue>> for DriverOptions {
    fn from(values: BTreeMap<String, OptionValue>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for DriverOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for DriverOptions {
    type Item = (String, OptionValue);
    type IntoIter = IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a DriverOptions {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

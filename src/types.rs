use std::fmt;

use serde::{Deserialize, Serialize};

/// A key and a value decoded together from one `key=value` entry.
///
/// Both halves are parsed and validated independently; identity is
/// positional, so `KeyValue` carries no ordering of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> From<(K, V)> for KeyValue<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

/// Where a setting's final value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Default,
    Env,
    Flag,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Default => write!(f, "default"),
            Source::Env => write!(f, "env"),
            Source::Flag => write!(f, "flag"),
        }
    }
}

/// Which part of a setting a validator rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The key half of a composite.
    Key,
    /// A scalar value, or the value half of a composite.
    Value,
    /// A composite's key and value checked jointly.
    Pair,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Key => write!(f, "key"),
            Field::Value => write!(f, "value"),
            Field::Pair => write!(f, "keyValue"),
        }
    }
}

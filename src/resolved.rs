//! The listing a successful commit hands back.

use std::fmt;

use serde::Serialize;

use crate::types::Source;

/// One declared setting after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub env: Option<String>,
    pub flag: Option<String>,
    /// Final value formatted through the setting's codec.
    pub value: String,
    pub source: Source,
}

impl Entry {
    /// Shown instead of the value of settings marked secret.
    pub const REDACTED: &'static str = "<redacted>";

    /// Human-readable name: `PORT, --p`, `HOST`, or `--tz`.
    pub fn name(&self) -> String {
        match (&self.env, &self.flag) {
            (Some(env), Some(flag)) => format!("{env}, --{flag}"),
            (Some(env), None) => env.clone(),
            (None, Some(flag)) => format!("--{flag}"),
            (None, None) => "<unbound>".to_string(),
        }
    }
}

/// Every setting bound by one commit, in declaration order, plus the
/// positional arguments left over after the flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub entries: Vec<Entry>,
    pub args: Vec<String>,
}

impl Resolved {
    /// First entry bound to env var `key`.
    pub fn by_env(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.env.as_deref() == Some(key))
    }

    /// First entry bound to flag `key`.
    pub fn by_flag(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.flag.as_deref() == Some(key))
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = {} ({})", entry.name(), entry.value, entry.source)?;
        }
        Ok(())
    }
}

use std::collections::HashMap;
use std::env::VarError;
use std::ffi::OsString;

/// Where environment lookups go.
///
/// `Process` reads the live environment at declaration time. `Fixed` holds a
/// snapshot built from any iterator of pairs, so tests can pass synthetic
/// data instead of mutating `std::env`.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EnvSource::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up `key`. A variable that is set but empty counts as absent.
    /// A value that isn't valid unicode comes back as the raw `OsString`.
    pub fn lookup(&self, key: &str) -> Result<Option<String>, OsString> {
        let value = match self {
            EnvSource::Process => match std::env::var(key) {
                Ok(value) => Some(value),
                Err(VarError::NotPresent) => None,
                Err(VarError::NotUnicode(raw)) => return Err(raw),
            },
            EnvSource::Fixed(vars) => vars.get(key).cloned(),
        };
        Ok(value.filter(|v| !v.is_empty()))
    }
}

/// Join an optional prefix onto a declared key: `("MYAPP", "PORT")` → `MYAPP_PORT`.
pub fn qualify(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}_{key}"),
        _ => key.to_string(),
    }
}

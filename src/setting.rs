use std::borrow::Cow;

use crate::codec::Codec;
use crate::env;
use crate::error::{BindError, CodecError, ValidationResult};
use crate::ledger::{Keys, Slot};
use crate::types::{Field, Source};

/// Rewrites a raw string before it reaches the codec.
pub type Transform<'a> = Box<dyn Fn(&str) -> Result<String, CodecError> + 'a>;

pub(crate) type Validator<'a, T> = Box<dyn Fn(&T) -> ValidationResult + 'a>;

/// One configuration slot: a borrowed target, its default, and where to
/// source it from.
///
/// ```ignore
/// let mut port = 0u16;
/// let mut binder = Binder::new();
/// binder.bind(
///     Setting::new(&mut port, 8080)
///         .env("PORT")
///         .flag("p")
///         .validate(|p| if *p >= 1024 { Ok(()) } else { Err("privileged port".into()) }),
/// );
/// binder.read()?;
/// ```
///
/// An empty env or flag key means "not sourced from there".
pub struct Setting<'a, T: Codec> {
    target: &'a mut T,
    default: T,
    keys: Keys,
    transform: Option<Transform<'a>>,
    validators: Vec<Validator<'a, T>>,
}

impl<'a, T: Codec + 'a> Setting<'a, T> {
    pub fn new(target: &'a mut T, default: T) -> Self {
        Self {
            target,
            default,
            keys: Keys::default(),
            transform: None,
            validators: Vec::new(),
        }
    }

    /// Source the value from environment variable `key`.
    pub fn env(mut self, key: impl Into<String>) -> Self {
        self.keys.env = non_empty(key.into());
        self
    }

    /// Source the value from flag `--key`.
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.keys.flag = non_empty(key.into());
        self
    }

    /// Help text shown by `--help`.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.keys.help = Some(text.into());
        self
    }

    /// Hide the value in [`Resolved`](crate::Resolved) listings.
    pub fn secret(mut self) -> Self {
        self.keys.secret = true;
        self
    }

    /// Rewrite raw input before parsing. A `bool` setting with a transform
    /// is no longer a bare switch: its flag requires a value.
    pub fn transform(
        mut self,
        f: impl Fn(&str) -> Result<String, CodecError> + 'a,
    ) -> Self {
        self.transform = Some(Box::new(f));
        self
    }

    /// Add a validator. Validators run at commit, in the order added.
    pub fn validate(mut self, f: impl Fn(&T) -> ValidationResult + 'a) -> Self {
        self.validators.push(Box::new(f));
        self
    }

    /// Write the default into the target and hand over the borrow.
    pub(crate) fn into_slot(self, env_prefix: Option<&str>) -> ScalarSlot<'a, T> {
        let Setting {
            target,
            default,
            mut keys,
            transform,
            validators,
        } = self;
        *target = default;
        keys.env = keys.env.map(|key| env::qualify(env_prefix, &key));
        ScalarSlot {
            target,
            keys,
            transform,
            validators,
            source: Source::Default,
        }
    }
}

pub(crate) fn non_empty(key: String) -> Option<String> {
    if key.is_empty() { None } else { Some(key) }
}

pub(crate) struct ScalarSlot<'a, T> {
    target: &'a mut T,
    keys: Keys,
    transform: Option<Transform<'a>>,
    validators: Vec<Validator<'a, T>>,
    source: Source,
}

impl<T: Codec> Slot for ScalarSlot<'_, T> {
    fn keys(&self) -> &Keys {
        &self.keys
    }

    fn is_switch(&self) -> bool {
        T::SWITCH && self.transform.is_none()
    }

    fn assign(&mut self, raw: &str, source: Source) -> Result<(), CodecError> {
        let raw = match &self.transform {
            Some(f) => Cow::Owned(f(raw)?),
            None => Cow::Borrowed(raw),
        };
        *self.target = T::parse(&raw)?;
        self.source = source;
        Ok(())
    }

    fn validate(&self) -> Result<(), BindError> {
        for validator in &self.validators {
            validator(&*self.target).map_err(|e| {
                BindError::validation(
                    self.keys.env.as_deref(),
                    self.keys.flag.as_deref(),
                    Field::Value,
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn current(&self) -> String {
        self.target.format()
    }

    fn source(&self) -> Source {
        self.source
    }
}

//! The declaration context and its commit step.

use std::ffi::OsString;

use tracing::{debug, trace};

use crate::cli::{self, FlagArg};
use crate::codec::Codec;
use crate::composite::PairSetting;
use crate::env::EnvSource;
use crate::error::{BindError, ValidationResult};
use crate::ledger::{Drained, FlagBinding, Ledger, Slot};
use crate::resolved::Resolved;
use crate::setting::Setting;
use crate::types::{KeyValue, Source};

/// Collects settings and commits them in one go.
///
/// Declaring a setting writes its default into the target and, when an env
/// key is given, sources the variable right away. Flags wait for
/// [`read`](Self::read): the command line is parsed once, after every
/// setting is known, and flag values override whatever the environment put
/// there. Validators run last.
///
/// ```ignore
/// let mut port = 0u16;
/// let mut host = String::new();
/// let mut debug = false;
///
/// let mut binder = Binder::new().named("myapp");
/// binder
///     .set(&mut port, 8080, "PORT", "p")
///     .set_env(&mut host, "localhost".into(), "HOST")
///     .set_flag(&mut debug, false, "debug");
/// let resolved = binder.read()?;
/// println!("{resolved}");
/// ```
///
/// Targets stay mutably borrowed until the binder is consumed by `read`.
pub struct Binder<'a> {
    name: String,
    env: EnvSource,
    env_prefix: Option<String>,
    env_error: Option<BindError>,
    ledger: Ledger<'a>,
}

impl Default for Binder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Binder<'a> {
    /// A binder reading the process environment.
    pub fn new() -> Self {
        Self {
            name: "app".to_string(),
            env: EnvSource::Process,
            env_prefix: None,
            env_error: None,
            ledger: Ledger::new(),
        }
    }

    /// A binder reading `vars` instead of the process environment.
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: EnvSource::fixed(vars),
            ..Self::new()
        }
    }

    /// Program name shown in usage and `--help`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Prefix every env key declared from here on: `PORT` becomes `APP_PORT`.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into()).filter(|p| !p.is_empty());
        self
    }

    /// Number of settings declared so far.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Declare a scalar setting.
    pub fn bind<T: Codec + 'a>(&mut self, setting: Setting<'a, T>) -> &mut Self {
        let slot = setting.into_slot(self.env_prefix.as_deref());
        self.register(Box::new(slot))
    }

    /// Declare a key/value setting.
    pub fn bind_pair<K: Codec + 'a, V: Codec + 'a>(
        &mut self,
        setting: PairSetting<'a, K, V>,
    ) -> &mut Self {
        let slot = setting.into_slot(self.env_prefix.as_deref());
        self.register(Box::new(slot))
    }

    pub fn set<T: Codec + 'a>(
        &mut self,
        target: &'a mut T,
        default: T,
        env: &str,
        flag: &str,
    ) -> &mut Self {
        self.bind(Setting::new(target, default).env(env).flag(flag))
    }

    pub fn set_env<T: Codec + 'a>(&mut self, target: &'a mut T, default: T, env: &str) -> &mut Self {
        self.bind(Setting::new(target, default).env(env))
    }

    pub fn set_flag<T: Codec + 'a>(
        &mut self,
        target: &'a mut T,
        default: T,
        flag: &str,
    ) -> &mut Self {
        self.bind(Setting::new(target, default).flag(flag))
    }

    pub fn set_validate<T: Codec + 'a>(
        &mut self,
        target: &'a mut T,
        default: T,
        env: &str,
        flag: &str,
        validator: impl Fn(&T) -> ValidationResult + 'a,
    ) -> &mut Self {
        self.bind(
            Setting::new(target, default)
                .env(env)
                .flag(flag)
                .validate(validator),
        )
    }

    pub fn set_env_validate<T: Codec + 'a>(
        &mut self,
        target: &'a mut T,
        default: T,
        env: &str,
        validator: impl Fn(&T) -> ValidationResult + 'a,
    ) -> &mut Self {
        self.bind(Setting::new(target, default).env(env).validate(validator))
    }

    pub fn set_flag_validate<T: Codec + 'a>(
        &mut self,
        target: &'a mut T,
        default: T,
        flag: &str,
        validator: impl Fn(&T) -> ValidationResult + 'a,
    ) -> &mut Self {
        self.bind(Setting::new(target, default).flag(flag).validate(validator))
    }

    pub fn set_pair<K: Codec + 'a, V: Codec + 'a>(
        &mut self,
        target: &'a mut KeyValue<K, V>,
        default: KeyValue<K, V>,
        env: &str,
        flag: &str,
    ) -> &mut Self {
        self.bind_pair(PairSetting::one(target, default).env(env).flag(flag))
    }

    /// Declare a single pair with key, value and joint validators. Use
    /// [`bind_pair`](Self::bind_pair) to attach only some of them.
    #[allow(clippy::too_many_arguments)]
    pub fn set_pair_validate<K: Codec + 'a, V: Codec + 'a>(
        &mut self,
        target: &'a mut KeyValue<K, V>,
        default: KeyValue<K, V>,
        env: &str,
        flag: &str,
        key_validator: impl Fn(&K) -> ValidationResult + 'a,
        value_validator: impl Fn(&V) -> ValidationResult + 'a,
        pair_validator: impl Fn(&K, &V) -> ValidationResult + 'a,
    ) -> &mut Self {
        self.bind_pair(
            PairSetting::one(target, default)
                .env(env)
                .flag(flag)
                .validate_key(key_validator)
                .validate_value(value_validator)
                .validate_pair(pair_validator),
        )
    }

    pub fn set_pairs<K: Codec + 'a, V: Codec + 'a>(
        &mut self,
        target: &'a mut Vec<KeyValue<K, V>>,
        default: Vec<KeyValue<K, V>>,
        env: &str,
        flag: &str,
    ) -> &mut Self {
        self.bind_pair(PairSetting::many(target, default).env(env).flag(flag))
    }

    /// Like [`set_pair_validate`](Self::set_pair_validate), with every
    /// validator applied to each entry.
    #[allow(clippy::too_many_arguments)]
    pub fn set_pairs_validate<K: Codec + 'a, V: Codec + 'a>(
        &mut self,
        target: &'a mut Vec<KeyValue<K, V>>,
        default: Vec<KeyValue<K, V>>,
        env: &str,
        flag: &str,
        key_validator: impl Fn(&K) -> ValidationResult + 'a,
        value_validator: impl Fn(&V) -> ValidationResult + 'a,
        pair_validator: impl Fn(&K, &V) -> ValidationResult + 'a,
    ) -> &mut Self {
        self.bind_pair(
            PairSetting::many(target, default)
                .env(env)
                .flag(flag)
                .validate_key(key_validator)
                .validate_value(value_validator)
                .validate_pair(pair_validator),
        )
    }

    fn register(&mut self, mut slot: Box<dyn Slot + 'a>) -> &mut Self {
        self.source_env(slot.as_mut());
        self.ledger.push(slot);
        self
    }

    /// Apply the env var, if set. Only the first failure is kept.
    fn source_env(&mut self, slot: &mut (dyn Slot + 'a)) {
        let Some(key) = slot.keys().env.clone() else {
            return;
        };
        let raw = match self.env.lookup(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(raw) => {
                let raw = raw.to_string_lossy().into_owned();
                self.record_env_error(key, raw, "value is not valid unicode");
                return;
            }
        };
        match slot.assign(&raw, Source::Env) {
            Ok(()) => debug!(env = %key, "sourced from environment"),
            Err(e) => self.record_env_error(key, raw, e),
        }
    }

    fn record_env_error(&mut self, key: String, raw: String, reason: impl std::fmt::Display) {
        debug!(env = %key, error = %reason, "invalid environment value");
        if self.env_error.is_none() {
            self.env_error = Some(BindError::InvalidEnv {
                key,
                raw,
                reason: reason.to_string(),
            });
        }
    }

    /// Commit against the process command line.
    pub fn read(self) -> Result<Resolved, BindError> {
        self.read_from(std::env::args_os())
    }

    /// Commit against `args`, whose first item is the program name.
    ///
    /// In order: a recorded env error is returned; flags are registered and
    /// parsed; every occurrence runs through its handlers; validators run in
    /// declaration order and the first failure is returned. Targets keep
    /// whatever was written before a failure.
    pub fn read_from<I, T>(mut self, args: I) -> Result<Resolved, BindError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let Drained { mut slots, flags } = self.ledger.drain();
        if let Some(err) = self.env_error.take() {
            return Err(err);
        }
        debug!(
            settings = slots.len(),
            flags = flags.len(),
            "committing configuration"
        );

        let flag_args: Vec<FlagArg> = flags.iter().map(|f| flag_arg(f, &slots)).collect();
        let matches = cli::parse(&self.name, &flag_args, args)?;

        for occurrence in cli::occurrences(&matches, &flag_args) {
            let binding = &flags[occurrence.flag];
            trace!(flag = %binding.key, raw = %occurrence.raw, "applying flag");
            for &index in &binding.chain {
                slots[index]
                    .assign(&occurrence.raw, Source::Flag)
                    .map_err(|e| BindError::InvalidFlag {
                        flag: binding.key.clone(),
                        raw: occurrence.raw.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }

        for slot in &slots {
            slot.validate()?;
        }

        Ok(Resolved {
            entries: slots.iter().map(|slot| slot.entry()).collect(),
            args: cli::positional(&matches),
        })
    }
}

/// Describe a drained flag for clap. Help and env come from the first slot
/// in the chain that has them; the default shown is the current value of
/// the first slot unless it is secret.
fn flag_arg(binding: &FlagBinding, slots: &[Box<dyn Slot + '_>]) -> FlagArg {
    let chain: Vec<&dyn Slot> = binding.chain.iter().map(|&i| slots[i].as_ref()).collect();
    FlagArg {
        key: binding.key.clone(),
        switch: binding.switch,
        help: chain.iter().find_map(|s| s.keys().help.clone()),
        env: chain.iter().find_map(|s| s.keys().env.clone()),
        default: chain
            .first()
            .filter(|s| !s.keys().secret)
            .map(|s| s.current()),
    }
}

//! Key/value settings decoded from a single delimited string.
//!
//! Grammar at the env/flag boundary:
//!
//! ```text
//! entry := key "=" value
//! array := entry ("," entry)*
//! ```
//!
//! Entries split on every `,`; within an entry the first `=` separates key
//! from value, so values may contain `=`. There is no escaping. Decoding is
//! two-pass: the whole string is split and every entry checked against the
//! grammar first, then exactly that many pairs are parsed. The target is
//! only written once every entry decoded.

use crate::codec::Codec;
use crate::env;
use crate::error::{BindError, BoxError, CodecError, ValidationResult};
use crate::ledger::{Keys, Slot};
use crate::setting::{Validator, non_empty};
use crate::types::{Field, KeyValue, Source};

const ENTRY_SEPARATOR: &str = ",";
const PAIR_SEPARATOR: &str = "=";

type PairValidator<'a, K, V> = Box<dyn Fn(&K, &V) -> ValidationResult + 'a>;

fn split_pair(entry: &str) -> Result<(&str, &str), CodecError> {
    entry
        .split_once(PAIR_SEPARATOR)
        .ok_or_else(|| CodecError::MissingSeparator {
            entry: entry.to_string(),
        })
}

/// Decode `k1=v1,k2=v2` into typed pairs.
pub fn decode_pairs<K: Codec, V: Codec>(raw: &str) -> Result<Vec<KeyValue<K, V>>, CodecError> {
    let entries = raw
        .split(ENTRY_SEPARATOR)
        .map(split_pair)
        .collect::<Result<Vec<_>, _>>()?;

    entries
        .into_iter()
        .map(|(key, value)| Ok(KeyValue::new(K::parse(key)?, V::parse(value)?)))
        .collect()
}

/// Encode pairs back into `k1=v1,k2=v2`.
pub fn encode_pairs<K: Codec, V: Codec>(pairs: &[KeyValue<K, V>]) -> String {
    pairs
        .iter()
        .map(encode_pair)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn encode_pair<K: Codec, V: Codec>(pair: &KeyValue<K, V>) -> String {
    format!("{}{PAIR_SEPARATOR}{}", pair.key.format(), pair.value.format())
}

enum PairTarget<'a, K, V> {
    One(&'a mut KeyValue<K, V>),
    Many(&'a mut Vec<KeyValue<K, V>>),
}

enum PairShape<'a, K, V> {
    One {
        target: &'a mut KeyValue<K, V>,
        default: KeyValue<K, V>,
    },
    Many {
        target: &'a mut Vec<KeyValue<K, V>>,
        default: Vec<KeyValue<K, V>>,
    },
}

/// A key/value setting, single or repeated.
///
/// `one` binds a [`KeyValue`]: the raw string may hold several entries, all
/// of which must decode, but only the first is kept. `many` binds a
/// `Vec<KeyValue>` with one element per entry.
///
/// Validators run key first, then value, then the pair jointly; for `many`
/// that sequence repeats per element in index order.
pub struct PairSetting<'a, K: Codec, V: Codec> {
    shape: PairShape<'a, K, V>,
    keys: Keys,
    key_validators: Vec<Validator<'a, K>>,
    value_validators: Vec<Validator<'a, V>>,
    pair_validators: Vec<PairValidator<'a, K, V>>,
}

impl<'a, K: Codec + 'a, V: Codec + 'a> PairSetting<'a, K, V> {
    pub fn one(target: &'a mut KeyValue<K, V>, default: KeyValue<K, V>) -> Self {
        Self::with_shape(PairShape::One { target, default })
    }

    pub fn many(target: &'a mut Vec<KeyValue<K, V>>, default: Vec<KeyValue<K, V>>) -> Self {
        Self::with_shape(PairShape::Many { target, default })
    }

    fn with_shape(shape: PairShape<'a, K, V>) -> Self {
        Self {
            shape,
            keys: Keys::default(),
            key_validators: Vec::new(),
            value_validators: Vec::new(),
            pair_validators: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>) -> Self {
        self.keys.env = non_empty(key.into());
        self
    }

    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.keys.flag = non_empty(key.into());
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.keys.help = Some(text.into());
        self
    }

    pub fn secret(mut self) -> Self {
        self.keys.secret = true;
        self
    }

    pub fn validate_key(mut self, f: impl Fn(&K) -> ValidationResult + 'a) -> Self {
        self.key_validators.push(Box::new(f));
        self
    }

    pub fn validate_value(mut self, f: impl Fn(&V) -> ValidationResult + 'a) -> Self {
        self.value_validators.push(Box::new(f));
        self
    }

    pub fn validate_pair(mut self, f: impl Fn(&K, &V) -> ValidationResult + 'a) -> Self {
        self.pair_validators.push(Box::new(f));
        self
    }

    pub(crate) fn into_slot(self, env_prefix: Option<&str>) -> PairSlot<'a, K, V> {
        let PairSetting {
            shape,
            mut keys,
            key_validators,
            value_validators,
            pair_validators,
        } = self;
        let target = match shape {
            PairShape::One { target, default } => {
                *target = default;
                PairTarget::One(target)
            }
            PairShape::Many { target, default } => {
                *target = default;
                PairTarget::Many(target)
            }
        };
        keys.env = keys.env.map(|key| env::qualify(env_prefix, &key));
        PairSlot {
            target,
            keys,
            key_validators,
            value_validators,
            pair_validators,
            source: Source::Default,
        }
    }
}

pub(crate) struct PairSlot<'a, K, V> {
    target: PairTarget<'a, K, V>,
    keys: Keys,
    key_validators: Vec<Validator<'a, K>>,
    value_validators: Vec<Validator<'a, V>>,
    pair_validators: Vec<PairValidator<'a, K, V>>,
    source: Source,
}

impl<K: Codec, V: Codec> PairSlot<'_, K, V> {
    fn check(&self, index: Option<usize>, pair: &KeyValue<K, V>) -> Result<(), BindError> {
        let fail = |field: Field, e: BoxError| {
            let reason = match index {
                Some(i) => format!("entry {i}: {e}"),
                None => e.to_string(),
            };
            BindError::validation(
                self.keys.env.as_deref(),
                self.keys.flag.as_deref(),
                field,
                reason,
            )
        };

        for validator in &self.key_validators {
            validator(&pair.key).map_err(|e| fail(Field::Key, e))?;
        }
        for validator in &self.value_validators {
            validator(&pair.value).map_err(|e| fail(Field::Value, e))?;
        }
        for validator in &self.pair_validators {
            validator(&pair.key, &pair.value).map_err(|e| fail(Field::Pair, e))?;
        }
        Ok(())
    }
}

impl<K: Codec, V: Codec> Slot for PairSlot<'_, K, V> {
    fn keys(&self) -> &Keys {
        &self.keys
    }

    fn is_switch(&self) -> bool {
        false
    }

    fn assign(&mut self, raw: &str, source: Source) -> Result<(), CodecError> {
        let pairs = decode_pairs::<K, V>(raw)?;
        match &mut self.target {
            PairTarget::One(target) => {
                if let Some(first) = pairs.into_iter().next() {
                    **target = first;
                }
            }
            PairTarget::Many(target) => **target = pairs,
        }
        self.source = source;
        Ok(())
    }

    fn validate(&self) -> Result<(), BindError> {
        match &self.target {
            PairTarget::One(pair) => self.check(None, pair),
            PairTarget::Many(pairs) => pairs
                .iter()
                .enumerate()
                .try_for_each(|(i, pair)| self.check(Some(i), pair)),
        }
    }

    fn current(&self) -> String {
        match &self.target {
            PairTarget::One(pair) => encode_pair(pair),
            PairTarget::Many(pairs) => encode_pairs(pairs),
        }
    }

    fn source(&self) -> Source {
        self.source
    }
}

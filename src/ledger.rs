//! Pending registrations between declaration and commit.
//!
//! Every declared setting becomes a [`Slot`] owning the borrow of its target.
//! Slots are kept in declaration order, which is also validation order. Flag
//! keys map to slot indices: value flags chain every slot sharing the key,
//! switch flags (untransformed `bool`) keep only the last slot declared.

use std::mem;

use tracing::debug;

use crate::error::{BindError, CodecError};
use crate::resolved::Entry;
use crate::types::Source;

/// Names and presentation details shared by every kind of slot.
#[derive(Debug, Clone, Default)]
pub(crate) struct Keys {
    pub env: Option<String>,
    pub flag: Option<String>,
    pub help: Option<String>,
    pub secret: bool,
}

/// One declared setting, type-erased.
pub(crate) trait Slot {
    fn keys(&self) -> &Keys;

    /// True when the flag should be registered as a bare switch.
    fn is_switch(&self) -> bool;

    /// Parse `raw` (after any transform) and store it in the target.
    /// On error the target is left untouched.
    fn assign(&mut self, raw: &str, source: Source) -> Result<(), CodecError>;

    /// Run every validator against the current target value.
    fn validate(&self) -> Result<(), BindError>;

    /// The current target value, formatted through its codec.
    fn current(&self) -> String;

    fn source(&self) -> Source;

    fn entry(&self) -> Entry {
        let keys = self.keys();
        Entry {
            env: keys.env.clone(),
            flag: keys.flag.clone(),
            value: if keys.secret {
                Entry::REDACTED.to_string()
            } else {
                self.current()
            },
            source: self.source(),
        }
    }
}

/// A flag ready to hand to the command-line parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlagBinding {
    pub key: String,
    pub switch: bool,
    /// Slot indices to run, in order, for every occurrence of the flag.
    pub chain: Vec<usize>,
}

/// Everything the ledger held, moved out in one piece.
pub(crate) struct Drained<'a> {
    pub slots: Vec<Box<dyn Slot + 'a>>,
    pub flags: Vec<FlagBinding>,
}

#[derive(Default)]
pub(crate) struct Ledger<'a> {
    slots: Vec<Box<dyn Slot + 'a>>,
    handlers: Vec<(String, Vec<usize>)>,
    switches: Vec<(String, usize)>,
}

impl<'a> Ledger<'a> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            handlers: Vec::new(),
            switches: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.handlers.is_empty() && self.switches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Record a slot and, if it has a flag key, bind the flag to it.
    pub fn push(&mut self, slot: Box<dyn Slot + 'a>) -> usize {
        let index = self.slots.len();
        let flag = slot.keys().flag.clone();
        let switch = slot.is_switch();
        self.slots.push(slot);

        if let Some(key) = flag {
            if switch {
                self.bind_switch(key, index);
            } else {
                self.bind_handler(key, index);
            }
        }
        index
    }

    fn bind_switch(&mut self, key: String, index: usize) {
        if let Some(existing) = self.switches.iter_mut().find(|(k, _)| *k == key) {
            debug!(flag = %key, "switch flag redeclared, last declaration wins");
            existing.1 = index;
        } else {
            self.switches.push((key, index));
        }
    }

    fn bind_handler(&mut self, key: String, index: usize) {
        if let Some((_, chain)) = self.handlers.iter_mut().find(|(k, _)| *k == key) {
            debug!(flag = %key, "chaining handler onto existing flag");
            chain.push(index);
        } else {
            self.handlers.push((key, vec![index]));
        }
    }

    /// Take every pending registration, leaving the ledger empty.
    ///
    /// Switches come first, then value flags. A switch whose key is also
    /// claimed by a value handler joins the end of that handler's chain.
    pub fn drain(&mut self) -> Drained<'a> {
        let slots = mem::take(&mut self.slots);
        let mut handlers = mem::take(&mut self.handlers);
        let switches = mem::take(&mut self.switches);

        let mut flags = Vec::with_capacity(switches.len() + handlers.len());
        for (key, index) in switches {
            if let Some((_, chain)) = handlers.iter_mut().find(|(k, _)| *k == key) {
                debug!(flag = %key, "switch merged into value flag of the same name");
                chain.push(index);
            } else {
                flags.push(FlagBinding {
                    key,
                    switch: true,
                    chain: vec![index],
                });
            }
        }
        flags.extend(handlers.into_iter().map(|(key, chain)| FlagBinding {
            key,
            switch: false,
            chain,
        }));

        Drained { slots, flags }
    }
}

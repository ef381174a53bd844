//! Typed settings bound from environment variables and command-line flags.
//!
//! Declare each setting against a variable you own, give it a default, name
//! the env var and/or flag that may override it, then commit once:
//!
//! ```ignore
//! let mut port = 0u16;
//! let mut host = String::new();
//! let mut langs: Vec<KeyValue<LanguageTag, bool>> = Vec::new();
//!
//! let mut binder = Binder::new().named("myapp");
//! binder
//!     .set_validate(&mut port, 8080, "PORT", "p", |p| {
//!         if *p >= 1024 { Ok(()) } else { Err("privileged port".into()) }
//!     })
//!     .set_env(&mut host, "localhost".into(), "HOST")
//!     .set_pairs(&mut langs, Vec::new(), "LANGS", "langs");
//! let resolved = binder.read()?;
//! ```
//!
//! After `read` returns `Ok`, every target holds a parsed, validated value.
//!
//! # Precedence
//!
//! ```text
//! Default              written at declaration
//!        ↑ overridden by
//! Environment          looked up at declaration
//!        ↑ overridden by
//! Flags                parsed at commit
//! ```
//!
//! Env vars are read as soon as a setting is declared, so the target already
//! holds the env value before the command line is looked at. Flags are
//! registered with clap only at commit, once every setting is known. An env
//! var that is set but empty counts as unset.
//!
//! # Types
//!
//! Any type implementing [`Codec`] can be bound. Out of the box that covers
//! the integers, floats, `bool`, `String`, [`Duration`](std::time::Duration)
//! (humantime syntax such as `1h 30m`), RFC 3339 timestamps, IANA time
//! zones, BCP 47 language tags, and single bytes or byte strings in
//! hex/octal/base32/base64 (see [`HexBytes`] and friends). Every [`Scalar`]
//! also binds as a `Vec`: the raw value splits on `,`, elements are trimmed
//! and empty ones skipped.
//!
//! Untransformed `bool` settings become switches: a bare `--verbose` means
//! `true`, `--verbose=false` turns it off.
//!
//! # Key/value settings
//!
//! [`KeyValue`] settings are written `key=value`, and `Vec<KeyValue>`
//! settings `k1=v1,k2=v2`. Entries split on every `,`; the first `=` in an
//! entry separates key from value. There is no escaping. A malformed entry
//! fails the whole string and leaves the target untouched. Key, value and
//! whole-pair validators can be attached independently; see
//! [`PairSetting`].
//!
//! # Commit
//!
//! [`Binder::read`] consumes the binder. In order it:
//!
//! 1. returns the first env var that failed to parse, if any
//! 2. builds a clap command from every declared flag and parses the
//!    command line
//! 3. feeds each flag occurrence, in command-line order, to the settings
//!    bound to it
//! 4. runs validators in declaration order and stops at the first failure
//!
//! On success it hands back a [`Resolved`] listing: each setting's final
//! value and where it came from. Positional arguments clap didn't consume
//! are in [`Resolved::args`].
//!
//! # Error handling
//!
//! Every failure is a [`BindError`] naming the env var or flag at fault.
//! Nothing is rolled back: a target keeps whatever value it held when the
//! failure happened. `--help` and unknown flags come back as
//! [`BindError::Cli`]; call `exit()` on the inner clap error to get clap's
//! usual output and exit code. With the `rich-errors` feature the error
//! also implements `miette::Diagnostic`.

pub mod error;
pub mod types;

mod binder;
mod bytes;
mod cli;
mod codec;
mod composite;
mod env;
mod ledger;
mod resolved;
mod setting;

#[cfg(test)]
mod fixtures;

pub use binder::Binder;
pub use bytes::{B32Bytes, B64Bytes, HexByte, HexBytes, OctByte};
pub use codec::{Codec, Scalar};
pub use composite::{PairSetting, decode_pairs, encode_pairs};
pub use error::{BindError, BoxError, CodecError, ValidationResult};
pub use resolved::{Entry, Resolved};
pub use setting::{Setting, Transform};
pub use types::{Field, KeyValue, Source};

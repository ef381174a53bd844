//! Byte newtypes that pick their text encoding by type.
//!
//! A `Vec<u8>` setting is a comma-separated list of decimal bytes. Wrap it
//! in one of these to read hex, base32 or base64 instead.

use std::ops::Deref;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use data_encoding::BASE32;

use crate::codec::{Codec, Scalar};
use crate::error::CodecError;

/// A single byte written in hex (`ff`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexByte(pub u8);

/// A single byte written in octal (`377`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OctByte(pub u8);

/// Bytes written as a hex string (`deadbeef`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HexBytes(pub Vec<u8>);

/// Bytes written as padded RFC 4648 base32.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct B32Bytes(pub Vec<u8>);

/// Bytes written as padded standard base64.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct B64Bytes(pub Vec<u8>);

impl Codec for HexByte {
    const NAME: &'static str = "hex byte";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        u8::from_str_radix(raw, 16)
            .map(HexByte)
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        format!("{:x}", self.0)
    }
}

impl Codec for OctByte {
    const NAME: &'static str = "octal byte";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        u8::from_str_radix(raw, 8)
            .map(OctByte)
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        format!("{:o}", self.0)
    }
}

impl Codec for HexBytes {
    const NAME: &'static str = "hex bytes";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        hex::decode(raw)
            .map(HexBytes)
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Codec for B32Bytes {
    const NAME: &'static str = "base32 bytes";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        BASE32
            .decode(raw.as_bytes())
            .map(B32Bytes)
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        BASE32.encode(&self.0)
    }
}

impl Codec for B64Bytes {
    const NAME: &'static str = "base64 bytes";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        STANDARD
            .decode(raw)
            .map(B64Bytes)
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl Scalar for HexByte {}
impl Scalar for OctByte {}
impl Scalar for HexBytes {}
impl Scalar for B32Bytes {}
impl Scalar for B64Bytes {}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for B32Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for B64Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

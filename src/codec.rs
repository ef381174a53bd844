//! Parse/format pairs for every type a setting can hold.
//!
//! The codec is chosen statically by the target's type: a `Setting<'_, u16>`
//! parses with `<u16 as Codec>::parse`. Element types implement [`Scalar`],
//! which gives them comma-separated sequences through `Vec<T>` for free.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use chrono_tz::Tz;
use language_tags::LanguageTag;

use crate::error::CodecError;

/// Conversion between a raw environment/flag string and a typed value.
pub trait Codec: Sized {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Whether a flag for this type may be given bare (`--verbose`) to mean
    /// `true`. Only `bool` sets this.
    const SWITCH: bool = false;

    fn parse(raw: &str) -> Result<Self, CodecError>;

    fn format(&self) -> String;
}

/// Marker for codecs that may appear as elements of a comma-separated list.
pub trait Scalar: Codec {}

/// Sequences: split on `,`, trim each element, skip empty ones.
impl<T: Scalar> Codec for Vec<T> {
    const NAME: &'static str = "list";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(T::parse)
            .collect()
    }

    fn format(&self) -> String {
        self.iter().map(Codec::format).collect::<Vec<_>>().join(",")
    }
}

macro_rules! from_str_codec {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Codec for $ty {
                const NAME: &'static str = $name;

                fn parse(raw: &str) -> Result<Self, CodecError> {
                    raw.parse::<$ty>()
                        .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
                }

                fn format(&self) -> String {
                    self.to_string()
                }
            }

            impl Scalar for $ty {}
        )*
    };
}

from_str_codec! {
    i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", i128 => "i128", isize => "isize",
    u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", u128 => "u128", usize => "usize",
    f32 => "f32", f64 => "f64",
}

impl Codec for bool {
    const NAME: &'static str = "bool";
    const SWITCH: bool = true;

    fn parse(raw: &str) -> Result<Self, CodecError> {
        match raw {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(CodecError::invalid(
                Self::NAME,
                raw,
                "expected one of 1, t, true, 0, f, false",
            )),
        }
    }

    fn format(&self) -> String {
        self.to_string()
    }
}

impl Codec for String {
    const NAME: &'static str = "string";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        Ok(raw.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }
}

/// Durations use humantime syntax: `90s`, `1h 30m`, `250ms`. Fractional
/// units (`1.5h`) and negative values are rejected.
impl Codec for Duration {
    const NAME: &'static str = "duration";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        humantime::parse_duration(raw).map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        humantime::format_duration(*self).to_string()
    }
}

/// RFC 3339 timestamps, offset preserved.
impl Codec for DateTime<FixedOffset> {
    const NAME: &'static str = "timestamp";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        DateTime::parse_from_rfc3339(raw).map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

/// RFC 3339 timestamps, normalized to UTC.
impl Codec for DateTime<Utc> {
    const NAME: &'static str = "timestamp";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

/// IANA time zone names (`Europe/Madrid`, `UTC`).
impl Codec for Tz {
    const NAME: &'static str = "time zone";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        raw.parse::<Tz>()
            .map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        self.name().to_string()
    }
}

/// BCP 47 language tags (`en`, `pt-BR`).
impl Codec for LanguageTag {
    const NAME: &'static str = "language tag";

    fn parse(raw: &str) -> Result<Self, CodecError> {
        LanguageTag::parse(raw).map_err(|e| CodecError::invalid(Self::NAME, raw, e))
    }

    fn format(&self) -> String {
        self.as_str().to_string()
    }
}

impl Scalar for bool {}
impl Scalar for String {}
impl Scalar for Duration {}
impl Scalar for DateTime<FixedOffset> {}
impl Scalar for DateTime<Utc> {}
impl Scalar for Tz {}
impl Scalar for LanguageTag {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn integers() {
        assert_eq!(u16::parse("8080").unwrap(), 8080);
        assert_eq!(i64::parse("-5").unwrap(), -5);
        assert!(u8::parse("256").is_err());
    }

    #[test]
    fn integer_error_names_type_and_input() {
        let msg = u16::parse("eighty").unwrap_err().to_string();
        assert!(msg.contains("u16"));
        assert!(msg.contains("eighty"));
    }

    #[test]
    fn bool_accepts_short_spellings() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(bool::parse(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert!(!bool::parse(raw).unwrap(), "{raw}");
        }
        assert!(bool::parse("yes").is_err());
        assert!(bool::parse("tRuE").is_err());
    }

    #[test]
    fn only_bool_is_a_switch() {
        assert!(<bool as Codec>::SWITCH);
        assert!(!<u16 as Codec>::SWITCH);
        assert!(!<Vec<bool> as Codec>::SWITCH);
    }

    #[test]
    fn string_is_identity() {
        assert_eq!(String::parse(" spaced ").unwrap(), " spaced ");
    }

    #[test]
    fn duration_humantime() {
        assert_eq!(
            Duration::parse("1h 30m").unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(Duration::parse("250ms").unwrap(), Duration::from_millis(250));
        assert!(Duration::parse("soon").is_err());
    }

    #[test]
    fn duration_rejects_fractions_and_negatives() {
        assert!(Duration::parse("1.5h").is_err());
        assert!(Duration::parse("-5s").is_err());
        assert_eq!(Duration::parse("1h 30m").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn timestamp_keeps_offset() {
        let ts = <DateTime<FixedOffset> as Codec>::parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(Codec::format(&ts), "2024-03-01T10:00:00+02:00");
    }

    #[test]
    fn timestamp_utc_normalizes() {
        let ts = <DateTime<Utc> as Codec>::parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        assert_eq!(Codec::format(&ts), "2024-03-01T08:00:00Z");
    }

    #[test]
    fn time_zone_by_name() {
        let tz = Tz::parse("Europe/Madrid").unwrap();
        assert_eq!(Codec::format(&tz), "Europe/Madrid");
        assert!(Tz::parse("Mars/Olympus").is_err());
    }

    #[test]
    fn language_tag() {
        let tag = LanguageTag::parse("pt-BR").unwrap();
        assert_eq!(<LanguageTag as Codec>::format(&tag), "pt-BR");
        assert!(<LanguageTag as Codec>::parse("not a tag").is_err());
    }

    #[test]
    fn list_trims_and_skips_empty() {
        assert_eq!(Vec::<u32>::parse(" 1, 2,,3 ,").unwrap(), vec![1, 2, 3]);
        assert_eq!(Vec::<u32>::parse("").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn list_fails_on_first_bad_element() {
        let err = Vec::<u32>::parse("1,x,y").unwrap_err();
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn list_format_joins_with_comma() {
        assert_eq!(vec![1u8, 2, 3].format(), "1,2,3");
        assert_eq!(Vec::<u8>::new().format(), "");
    }

    proptest! {
        #[test]
        fn i64_round_trip(v in any::<i64>()) {
            prop_assert_eq!(i64::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn u16_list_round_trip(v in proptest::collection::vec(any::<u16>(), 0..16)) {
            prop_assert_eq!(Vec::<u16>::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn duration_round_trip(ms in 0u64..10_000_000_000) {
            let d = Duration::from_millis(ms);
            prop_assert_eq!(Duration::parse(&d.format()).unwrap(), d);
        }

        #[test]
        fn duration_list_round_trip(ms in proptest::collection::vec(0u64..10_000_000_000, 0..8)) {
            let v: Vec<Duration> = ms.into_iter().map(Duration::from_millis).collect();
            prop_assert_eq!(Vec::<Duration>::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn bool_round_trip(v in any::<bool>()) {
            prop_assert_eq!(bool::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn f32_round_trip(v in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
            prop_assert_eq!(f32::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn f64_round_trip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
            prop_assert_eq!(f64::parse(&v.format()).unwrap(), v);
        }

        #[test]
        fn timestamp_round_trip(
            secs in 86_400i64..253_402_214_400,
            nanos in 0u32..1_000_000_000,
            offset_minutes in -1439i32..1440,
        ) {
            let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
            let ts = offset.timestamp_opt(secs, nanos).unwrap();
            let back = <DateTime<FixedOffset> as Codec>::parse(&Codec::format(&ts)).unwrap();
            prop_assert_eq!(back, ts);
            prop_assert_eq!(back.offset(), ts.offset());
        }

        #[test]
        fn utc_timestamp_round_trip(
            secs in 0i64..253_402_300_799,
            nanos in 0u32..1_000_000_000,
        ) {
            let ts = Utc.timestamp_opt(secs, nanos).unwrap();
            let back = <DateTime<Utc> as Codec>::parse(&Codec::format(&ts)).unwrap();
            prop_assert_eq!(back, ts);
        }
    }

    #[test]
    fn every_time_zone_round_trips() {
        for tz in chrono_tz::TZ_VARIANTS {
            assert_eq!(Tz::parse(&tz.format()).unwrap(), tz, "{}", tz.name());
        }
    }

    #[test]
    fn language_tags_round_trip() {
        for raw in [
            "en",
            "pt-BR",
            "zh-Hant-TW",
            "sr-Latn-RS",
            "de-CH-1996",
            "en-US-u-ca-gregory",
        ] {
            let tag = LanguageTag::parse(raw).unwrap();
            assert_eq!(<LanguageTag as Codec>::parse(&Codec::format(&tag)).unwrap(), tag, "{raw}");
        }
    }
}

#[cfg(test)]
pub mod test {
    use language_tags::LanguageTag;

    use crate::error::{BindError, CodecError, ValidationResult};
    use crate::ledger::{Keys, Slot};
    use crate::types::Source;

    /// Command line with a program name in front.
    pub fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("app")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    pub fn at_least(min: u16) -> impl Fn(&u16) -> ValidationResult {
        move |v| {
            if *v < min {
                return Err(format!("value must be greater or equal than {min}").into());
            }
            Ok(())
        }
    }

    pub fn not_spanish(tag: &LanguageTag) -> ValidationResult {
        if tag.as_str() == "es" {
            return Err("spanish not allowed".into());
        }
        Ok(())
    }

    pub fn only_true(v: &bool) -> ValidationResult {
        if !*v {
            return Err("value can only be true".into());
        }
        Ok(())
    }

    pub fn french_only_false(tag: &LanguageTag, v: &bool) -> ValidationResult {
        if tag.as_str() == "fr" && *v {
            return Err("french can only be false".into());
        }
        Ok(())
    }

    pub fn tag(raw: &str) -> LanguageTag {
        LanguageTag::parse(raw).unwrap()
    }

    /// Slot with no target, for exercising the ledger on its own.
    pub struct FakeSlot {
        pub keys: Keys,
        pub switch: bool,
    }

    impl FakeSlot {
        pub fn env(key: &str) -> Self {
            Self {
                keys: Keys {
                    env: Some(key.into()),
                    ..Keys::default()
                },
                switch: false,
            }
        }

        pub fn flag(key: &str) -> Self {
            Self {
                keys: Keys {
                    flag: Some(key.into()),
                    ..Keys::default()
                },
                switch: false,
            }
        }

        pub fn switch(key: &str) -> Self {
            Self {
                switch: true,
                ..Self::flag(key)
            }
        }
    }

    impl Slot for FakeSlot {
        fn keys(&self) -> &Keys {
            &self.keys
        }

        fn is_switch(&self) -> bool {
            self.switch
        }

        fn assign(&mut self, _raw: &str, _source: Source) -> Result<(), CodecError> {
            Ok(())
        }

        fn validate(&self) -> Result<(), BindError> {
            Ok(())
        }

        fn current(&self) -> String {
            "fake".into()
        }

        fn source(&self) -> Source {
            Source::Default
        }
    }
}

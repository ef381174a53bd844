use thiserror::Error;

use crate::types::Field;

/// Error type returned by validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by validators.
pub type ValidationResult = Result<(), BoxError>;

/// Failure to turn a raw string into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid {type_name} {raw:?}: {reason}")]
    Invalid {
        type_name: &'static str,
        raw: String,
        reason: String,
    },

    #[error("\"=\" sign not found for key-value property {entry:?}")]
    MissingSeparator { entry: String },

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    pub fn invalid(type_name: &'static str, raw: &str, reason: impl std::fmt::Display) -> Self {
        CodecError::Invalid {
            type_name,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build an error from any message, for use in transforms.
    pub fn custom(reason: impl std::fmt::Display) -> Self {
        CodecError::Custom(reason.to_string())
    }
}

/// Every way a commit can fail. All of them name the env var or flag at fault.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum BindError {
    #[error("invalid value \"{raw}\" for env \"{key}\": {reason}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(confbind::env),
            help("unset the variable or give it a value of the declared type")
        )
    )]
    InvalidEnv {
        key: String,
        raw: String,
        reason: String,
    },

    #[error("invalid value \"{raw}\" for flag \"{flag}\": {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(confbind::flag)))]
    InvalidFlag {
        flag: String,
        raw: String,
        reason: String,
    },

    #[error("invalid {field} for env \"{env}\" or flag \"{flag}\", {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(confbind::validation)))]
    Validation {
        env: String,
        flag: String,
        field: Field,
        reason: String,
    },

    #[error("{0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(confbind::cli)))]
    Cli(#[from] clap::Error),
}

impl BindError {
    pub(crate) fn validation(
        env: Option<&str>,
        flag: Option<&str>,
        field: Field,
        reason: impl std::fmt::Display,
    ) -> Self {
        BindError::Validation {
            env: env.unwrap_or_default().to_string(),
            flag: flag.unwrap_or_default().to_string(),
            field,
            reason: reason.to_string(),
        }
    }
}

use std::fmt;
use std::io;

use thiserror::Error;

use crate::url::UrlError;

/// Which baseline source produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The field's environment variable was set.
    Env,
    /// The field's `def` annotation (possibly empty).
    Def,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Env => f.write_str("env"),
            Origin::Def => f.write_str("def"),
        }
    }
}

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum Error {
    #[error("invalid config type")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagenv::invalid_config_type),
            help("pass a mutable reference to a struct that implements Config")
        )
    )]
    InvalidConfigType,

    #[error("{field} {origin}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::field)))]
    Field {
        field: &'static str,
        origin: Origin,
        source: ValueError,
    },

    #[error("flag redefined: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagenv::flag_redefined),
            help("give one of the fields an explicit `flag` name")
        )
    )]
    FlagRedefined(String),

    #[error("bad flag syntax: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::bad_flag_syntax)))]
    BadFlagSyntax(String),

    #[error("flag provided but not defined: -{0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::undefined_flag)))]
    UndefinedFlag(String),

    #[error("flag needs an argument: -{0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::missing_argument)))]
    MissingArgument(String),

    #[error("invalid value {value:?} for flag -{flag}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::invalid_flag_value)))]
    InvalidFlagValue {
        flag: String,
        value: String,
        source: ValueError,
    },

    #[error("invalid boolean value {value:?} for -{flag}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::invalid_boolean_value)))]
    InvalidBooleanValue {
        flag: String,
        value: String,
        source: ValueError,
    },

    /// Usage was requested with `-h`/`-help` and has been printed.
    #[error("flag: help requested")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::help)))]
    Help,

    #[error("writing usage: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(flagenv::output)))]
    Output(#[from] io::Error),
}

impl Error {
    pub fn is_help(&self) -> bool {
        matches!(self, Error::Help)
    }
}

/// A text value that could not be converted into its field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ValueError {
    #[error("parsing value: type not supported: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(flagenv::unsupported_type),
            help("supported leaf types are bool, String, u32, u64, i32, i64, f64, Duration, StringList, IntList, Url and Timestamp")
        )
    )]
    UnsupportedType(&'static str),

    #[error("parsing {kind} {value:?}: {reason}")]
    Syntax {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("parsing int {token:?}: {reason}")]
    IntList { token: String, reason: String },

    #[error("parsing url: {0}")]
    Url(#[from] UrlError),

    #[error("parsing time {value:?}: {reason}")]
    Timestamp { value: String, reason: String },
}

impl ValueError {
    pub(crate) fn syntax(kind: &'static str, value: &str, reason: impl fmt::Display) -> Self {
        ValueError::Syntax {
            kind,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

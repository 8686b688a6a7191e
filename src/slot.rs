//! How a field's storage is exposed to the binder.
//!
//! Every field type implements [`Bind`], which hands out a [`Slot`]: a typed
//! mutable reference the binder can store a baseline into and hand to the flag
//! set, a nested [`Config`] record to recurse into, or a marker for a type the
//! binder cannot handle.

use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

use crate::duration;
use crate::error::ValueError;
use crate::value::{IntList, StringList, Timestamp, Url};
use crate::walk::Config;

/// A type that can appear as a field of a [`Config`] struct.
///
/// Implemented for the supported leaf types, for every `Config` record, and
/// for common types the binder rejects at bind time.
pub trait Bind {
    fn slot(&mut self) -> Slot<'_>;
}

pub enum Slot<'a> {
    Leaf(Leaf<'a>),
    Record(&'a mut dyn Config),
    /// The name of a type the binder has no conversion for.
    Unsupported(&'static str),
}

/// Mutable access to one supported leaf value.
pub enum Leaf<'a> {
    Bool(&'a mut bool),
    String(&'a mut String),
    Uint(&'a mut u32),
    Uint64(&'a mut u64),
    Int(&'a mut i32),
    Int64(&'a mut i64),
    Duration(&'a mut Duration),
    Float64(&'a mut f64),
    StringList(&'a mut StringList),
    IntList(&'a mut IntList),
    Url(&'a mut Url),
    Timestamp(&'a mut Timestamp),
}

impl Leaf<'_> {
    /// Parses `text` into the slot. Used for command-line values.
    pub fn set(&mut self, text: &str) -> Result<(), ValueError> {
        match self {
            Leaf::Bool(v) => **v = parse_bool(text)?,
            Leaf::String(v) => **v = text.to_string(),
            Leaf::Uint(v) => **v = parse_uint("uint", text)?,
            Leaf::Uint64(v) => **v = parse_uint("uint64", text)?,
            Leaf::Int(v) => **v = text.parse().map_err(|e| ValueError::syntax("int", text, e))?,
            Leaf::Int64(v) => {
                **v = text.parse().map_err(|e| ValueError::syntax("int64", text, e))?
            }
            Leaf::Duration(v) => {
                **v = duration::parse(text).map_err(|e| ValueError::syntax("duration", text, e))?
            }
            Leaf::Float64(v) => {
                **v = text.parse().map_err(|e| ValueError::syntax("float64", text, e))?
            }
            Leaf::StringList(v) => v.set(text)?,
            Leaf::IntList(v) => v.set(text)?,
            Leaf::Url(v) => v.set(text)?,
            Leaf::Timestamp(v) => v.set(text)?,
        }
        Ok(())
    }

    /// Stores an environment or default value. Empty text resets the slot to
    /// its zero value without parsing.
    pub(crate) fn set_baseline(&mut self, text: &str) -> Result<(), ValueError> {
        if !text.is_empty() {
            return self.set(text);
        }
        match self {
            Leaf::Bool(v) => **v = false,
            Leaf::String(v) => v.clear(),
            Leaf::Uint(v) => **v = 0,
            Leaf::Uint64(v) => **v = 0,
            Leaf::Int(v) => **v = 0,
            Leaf::Int64(v) => **v = 0,
            Leaf::Duration(v) => **v = Duration::ZERO,
            Leaf::Float64(v) => **v = 0.0,
            Leaf::StringList(v) => **v = StringList::default(),
            Leaf::IntList(v) => **v = IntList::default(),
            Leaf::Url(v) => **v = Url::default(),
            Leaf::Timestamp(v) => **v = Timestamp::default(),
        }
        Ok(())
    }

    /// The current value as text.
    pub fn display(&self) -> String {
        match self {
            Leaf::Bool(v) => v.to_string(),
            Leaf::String(v) => v.to_string(),
            Leaf::Uint(v) => v.to_string(),
            Leaf::Uint64(v) => v.to_string(),
            Leaf::Int(v) => v.to_string(),
            Leaf::Int64(v) => v.to_string(),
            Leaf::Duration(v) => duration::format(**v),
            Leaf::Float64(v) => v.to_string(),
            Leaf::StringList(v) => v.to_string(),
            Leaf::IntList(v) => v.to_string(),
            Leaf::Url(v) => v.to_string(),
            Leaf::Timestamp(v) => v.to_string(),
        }
    }

    /// What [`display`](Self::display) shows for the zero value of this type.
    pub fn zero_display(&self) -> &'static str {
        match self {
            Leaf::Bool(_) => "false",
            Leaf::String(_) | Leaf::Url(_) | Leaf::Timestamp(_) => "",
            Leaf::Uint(_) | Leaf::Uint64(_) | Leaf::Int(_) | Leaf::Int64(_) | Leaf::Float64(_) => {
                "0"
            }
            Leaf::Duration(_) => "0s",
            Leaf::StringList(_) | Leaf::IntList(_) => "[]",
        }
    }

    /// Placeholder shown after the flag name in usage output.
    pub fn type_hint(&self) -> &'static str {
        match self {
            Leaf::Bool(_) => "",
            Leaf::String(_) => "string",
            Leaf::Uint(_) | Leaf::Uint64(_) => "uint",
            Leaf::Int(_) | Leaf::Int64(_) => "int",
            Leaf::Duration(_) => "duration",
            Leaf::Float64(_) => "float",
            Leaf::StringList(_) | Leaf::IntList(_) | Leaf::Url(_) | Leaf::Timestamp(_) => "value",
        }
    }

    /// Boolean flags may be given without a value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Leaf::Bool(_))
    }

    pub(crate) fn is_string(&self) -> bool {
        matches!(self, Leaf::String(_))
    }
}

pub(crate) fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::syntax("bool", text, "invalid syntax")),
    }
}

/// Digits only; unlike `FromStr`, a leading `+` is rejected.
fn parse_uint<T: FromStr<Err = ParseIntError>>(
    kind: &'static str,
    text: &str,
) -> Result<T, ValueError> {
    if text.starts_with('+') {
        return Err(ValueError::syntax(kind, text, "invalid syntax"));
    }
    text.parse().map_err(|e| ValueError::syntax(kind, text, e))
}

impl<T: Config> Bind for T {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Record(self)
    }
}

macro_rules! leaf {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl Bind for $ty {
            fn slot(&mut self) -> Slot<'_> {
                Slot::Leaf(Leaf::$variant(self))
            }
        }
    )*};
}

leaf! {
    bool => Bool,
    String => String,
    u32 => Uint,
    u64 => Uint64,
    i32 => Int,
    i64 => Int64,
    Duration => Duration,
    f64 => Float64,
    StringList => StringList,
    IntList => IntList,
    Url => Url,
    Timestamp => Timestamp,
}

macro_rules! unsupported {
    ($($ty:ty),* $(,)?) => {$(
        impl Bind for $ty {
            fn slot(&mut self) -> Slot<'_> {
                Slot::Unsupported(stringify!($ty))
            }
        }
    )*};
}

unsupported!(i8, i16, i128, isize, u8, u16, u128, usize, f32, char);

impl<T> Bind for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("Vec")
    }
}

impl<T> Bind for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Unsupported("Option")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf<T: Bind>(value: &mut T) -> Leaf<'_> {
        match value.slot() {
            Slot::Leaf(leaf) => leaf,
            _ => panic!("not a leaf"),
        }
    }

    #[test]
    fn bool_grammar() {
        for text in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(text), Ok(true), "{text}");
        }
        for text in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(text), Ok(false), "{text}");
        }
        let err = parse_bool("yes").unwrap_err();
        assert_eq!(err.to_string(), r#"parsing bool "yes": invalid syntax"#);
    }

    #[test]
    fn numbers_name_their_kind_on_error() {
        let mut port = 0u32;
        let err = leaf(&mut port).set("a").unwrap_err();
        assert!(err.to_string().starts_with(r#"parsing uint "a": "#), "{err}");

        let mut distance = 0i64;
        let err = leaf(&mut distance).set("a").unwrap_err();
        assert!(err.to_string().starts_with(r#"parsing int64 "a": "#), "{err}");

        let mut balance = 0f64;
        let err = leaf(&mut balance).set("a").unwrap_err();
        assert!(err.to_string().starts_with(r#"parsing float64 "a": "#), "{err}");
    }

    #[test]
    fn uint_rejects_out_of_range() {
        let mut port = 0u32;
        assert!(leaf(&mut port).set("4294967296").is_err());
        assert!(leaf(&mut port).set("-1").is_err());
    }

    #[test]
    fn unsigned_rejects_plus_sign() {
        let mut port = 7u32;
        let err = leaf(&mut port).set("+5").unwrap_err();
        assert_eq!(err.to_string(), r#"parsing uint "+5": invalid syntax"#);
        assert_eq!(port, 7);

        let mut size = 7u64;
        assert!(leaf(&mut size).set("+5").is_err());
        leaf(&mut size).set("5").unwrap();
        assert_eq!(size, 5);

        let mut offset = 0i32;
        leaf(&mut offset).set("+5").unwrap();
        assert_eq!(offset, 5);
    }

    #[test]
    fn empty_baseline_resets_to_zero() {
        let mut name = String::from("set");
        leaf(&mut name).set_baseline("").unwrap();
        assert_eq!(name, "");

        let mut timeout = Duration::from_secs(3);
        leaf(&mut timeout).set_baseline("").unwrap();
        assert_eq!(timeout, Duration::ZERO);

        let mut url: Url = "//foo.bar".parse().unwrap();
        leaf(&mut url).set_baseline("").unwrap();
        assert!(!url.is_set());

        let mut at: Timestamp = "2002-10-02T15:00:00Z".parse().unwrap();
        leaf(&mut at).set_baseline("").unwrap();
        assert_eq!(at, Timestamp::default());
    }

    #[test]
    fn duration_display_and_hint() {
        let mut timeout = Duration::ZERO;
        let mut slot = leaf(&mut timeout);
        slot.set("1.5s").unwrap();
        assert_eq!(slot.display(), "1.5s");
        assert_eq!(slot.zero_display(), "0s");
        assert_eq!(slot.type_hint(), "duration");
    }

    #[test]
    fn adapters_use_value_hint() {
        let mut list = StringList::default();
        let slot = leaf(&mut list);
        assert_eq!(slot.type_hint(), "value");
        assert_eq!(slot.display(), slot.zero_display());
    }

    #[test]
    fn unsupported_types_name_themselves() {
        assert!(matches!(0i16.slot(), Slot::Unsupported("i16")));
        assert!(matches!(0u8.slot(), Slot::Unsupported("u8")));
        assert!(matches!(Vec::<u32>::new().slot(), Slot::Unsupported("Vec")));
        assert!(matches!(None::<u32>.slot(), Slot::Unsupported("Option")));
    }
}

//! Composite value types that bind from a single text value.
//!
//! [`StringList`] and [`IntList`] read comma-separated input, [`Url`] reads a
//! URL reference and [`Timestamp`] an RFC 3339 time. They implement
//! [`Bind`](crate::Bind), so they can be used directly as config fields, and
//! behave like any other value type outside the binder (`FromStr`,
//! `Display`, serde).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;
use crate::url::UrlParts;

/// A list of strings, set from `a,b,c`.
///
/// There is no escaping: every comma separates two items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Replaces the contents with the comma-separated items of `text`.
    /// Empty input leaves the list untouched.
    pub fn set(&mut self, text: &str) -> Result<(), ValueError> {
        if !text.is_empty() {
            self.0 = text.split(',').map(str::to_string).collect();
        }
        Ok(())
    }

    pub fn get(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("[]");
        }
        write!(f, "['{}']", self.0.join("','"))
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

/// A list of integers, set from `1,2,3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntList(pub Vec<i64>);

impl IntList {
    /// Replaces the contents with the comma-separated integers of `text`.
    ///
    /// The first token that is not a base-10 integer clears the list and is
    /// reported. Empty input leaves the list untouched.
    pub fn set(&mut self, text: &str) -> Result<(), ValueError> {
        if text.is_empty() {
            return Ok(());
        }
        let parsed: Result<Vec<i64>, ValueError> = text
            .split(',')
            .map(|token| {
                token.parse::<i64>().map_err(|e| ValueError::IntList {
                    token: token.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect();
        match parsed {
            Ok(items) => {
                self.0 = items;
                Ok(())
            }
            Err(e) => {
                self.0.clear();
                Err(e)
            }
        }
    }

    pub fn get(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for IntList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{n}")?;
        }
        f.write_str("]")
    }
}

impl From<Vec<i64>> for IntList {
    fn from(items: Vec<i64>) -> Self {
        Self(items)
    }
}

/// An optional URL reference. Unset until a value has been set successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Url(pub Option<UrlParts>);

impl Url {
    /// Parses `text` as a URL reference. Empty input sets the empty URL; a
    /// parse failure leaves the value unset.
    pub fn set(&mut self, text: &str) -> Result<(), ValueError> {
        match UrlParts::parse(text) {
            Ok(parts) => {
                self.0 = Some(parts);
                Ok(())
            }
            Err(e) => {
                self.0 = None;
                Err(e.into())
            }
        }
    }

    /// The parsed components, or empty components when unset.
    pub fn get(&self) -> UrlParts {
        self.0.clone().unwrap_or_default()
    }

    pub fn as_parts(&self) -> Option<&UrlParts> {
        self.0.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(parts) => fmt::Display::fmt(parts, f),
            None => Ok(()),
        }
    }
}

/// An optional RFC 3339 timestamp, keeping the offset it was written with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timestamp(pub Option<DateTime<FixedOffset>>);

impl Timestamp {
    /// Parses `text` as RFC 3339, fractional seconds allowed. Both failure and
    /// empty input leave the value unset.
    ///
    /// Date and time must be separated by `T` or `t`.
    pub fn set(&mut self, text: &str) -> Result<(), ValueError> {
        if let Some(&sep) = text.as_bytes().get(10)
            && sep != b'T'
            && sep != b't'
        {
            self.0 = None;
            return Err(ValueError::Timestamp {
                value: text.to_string(),
                reason: "expected 'T' between date and time".to_string(),
            });
        }
        match DateTime::parse_from_rfc3339(text) {
            Ok(at) => {
                self.0 = Some(at);
                Ok(())
            }
            Err(e) => {
                self.0 = None;
                Err(ValueError::Timestamp {
                    value: text.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    pub fn get(&self) -> Option<DateTime<FixedOffset>> {
        self.0
    }
}

/// Whole seconds, `Z` for UTC.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => Ok(()),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self(Some(at))
    }
}

macro_rules! from_str_via_set {
    ($($ty:ty),*) => {$(
        impl FromStr for $ty {
            type Err = ValueError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                let mut value = Self::default();
                value.set(text)?;
                Ok(value)
            }
        }
    )*};
}

from_str_via_set!(StringList, IntList, Url, Timestamp);

// Url and Timestamp travel as their display strings; the empty string is unset.

impl Serialize for Url {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::UrlError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // -- StringList ------------------------------------------------------------

    #[test]
    fn string_list_empty() {
        let mut list = StringList::default();
        list.set("").unwrap();
        assert_eq!(list.to_string(), "[]");
        assert!(list.get().is_empty());
    }

    #[test]
    fn string_list_one() {
        let list: StringList = "foo".parse().unwrap();
        assert_eq!(list.to_string(), "['foo']");
        assert_eq!(list.get(), strings(&["foo"]));
    }

    #[test]
    fn string_list_multi() {
        let mut list = StringList::default();
        list.set("foo,bar,baz").unwrap();
        assert_eq!(list.to_string(), "['foo','bar','baz']");
        assert_eq!(list.get(), strings(&["foo", "bar", "baz"]));
    }

    #[test]
    fn string_list_set_replaces() {
        let mut list = StringList::from(strings(&["old"]));
        list.set("a,b").unwrap();
        assert_eq!(list.get(), strings(&["a", "b"]));
        list.set("").unwrap();
        assert_eq!(list.get(), strings(&["a", "b"]));
    }

    #[test]
    fn string_list_keeps_empty_items() {
        let list: StringList = "a,,b".parse().unwrap();
        assert_eq!(list.get(), strings(&["a", "", "b"]));
    }

    // -- IntList ---------------------------------------------------------------

    #[test]
    fn int_list_valid() {
        let mut list = IntList::default();
        list.set("1").unwrap();
        assert_eq!(list.to_string(), "[1]");
        list.set("1,2,3").unwrap();
        assert_eq!(list.get(), [1, 2, 3]);
        assert_eq!(list.to_string(), "[1,2,3]");
    }

    #[test]
    fn int_list_empty() {
        let mut list = IntList::default();
        list.set("").unwrap();
        assert_eq!(list.to_string(), "[]");
    }

    #[test]
    fn int_list_invalid_clears() {
        let mut list = IntList::from(vec![7]);
        let err = list.set("1,foo,2").unwrap_err();
        assert!(list.get().is_empty());
        assert_eq!(list.to_string(), "[]");
        assert!(err.to_string().starts_with(r#"parsing int "foo": "#), "{err}");
    }

    #[test]
    fn int_list_invalid_one() {
        let mut list = IntList::default();
        assert!(list.set("foo").is_err());
        assert!(list.get().is_empty());
    }

    #[test]
    fn int_list_signed() {
        let list: IntList = "-4,+5".parse().unwrap();
        assert_eq!(list.get(), [-4, 5]);
    }

    // -- Url -------------------------------------------------------------------

    #[test]
    fn url_unset_displays_empty() {
        let url = Url::default();
        assert!(!url.is_set());
        assert_eq!(url.to_string(), "");
        assert_eq!(url.get(), UrlParts::default());
    }

    #[test]
    fn url_empty_input_is_zero_url() {
        let mut url = Url::default();
        url.set("").unwrap();
        assert!(url.is_set());
        assert_eq!(url.to_string(), "");
        assert_eq!(url.get(), UrlParts::default());
    }

    #[test]
    fn url_path() {
        let url: Url = "foo.bar".parse().unwrap();
        assert_eq!(url.to_string(), "foo.bar");
        assert_eq!(url.get(), UrlParts { path: "foo.bar".into(), ..Default::default() });
    }

    #[test]
    fn url_host() {
        let url: Url = "//foo.bar".parse().unwrap();
        assert_eq!(url.to_string(), "//foo.bar");
        assert_eq!(url.get(), UrlParts { host: "foo.bar".into(), ..Default::default() });
    }

    #[test]
    fn url_full() {
        let url: Url = "https://foo.bar/baz?qux=1".parse().unwrap();
        assert_eq!(url.to_string(), "https://foo.bar/baz?qux=1");
        let parts = url.as_parts().unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.host, "foo.bar");
        assert_eq!(parts.path, "/baz");
        assert_eq!(parts.raw_query, "qux=1");
    }

    #[test]
    fn url_invalid_resets() {
        let mut url: Url = "//foo.bar".parse().unwrap();
        let err = url.set("%").unwrap_err();
        assert_eq!(err, ValueError::Url(UrlError::InvalidEscape("%".into())));
        assert_eq!(err.to_string(), r#"parsing url: invalid URL escape "%""#);
        assert!(!url.is_set());
        assert_eq!(url.to_string(), "");
    }

    #[test]
    fn url_bad_port_is_rejected() {
        let mut url = Url::default();
        let err = url.set("http://foo:bar/").unwrap_err();
        assert_eq!(err.to_string(), r#"parsing url: invalid port ":bar" after host"#);
        assert!(!url.is_set());
        assert!("http://[::1]x/".parse::<Url>().is_err());
    }

    // -- Timestamp -------------------------------------------------------------

    #[test]
    fn timestamp_empty_errors() {
        let mut at = Timestamp::default();
        assert!(at.set("").is_err());
        assert_eq!(at.get(), None);
        assert_eq!(at.to_string(), "");
    }

    #[test]
    fn timestamp_keeps_offset() {
        let at: Timestamp = "2002-10-02T10:00:00-05:00".parse().unwrap();
        assert_eq!(at.to_string(), "2002-10-02T10:00:00-05:00");
    }

    #[test]
    fn timestamp_utc_round_trip() {
        let at: Timestamp = "2002-10-02T15:00:00Z".parse().unwrap();
        assert_eq!(at.to_string(), "2002-10-02T15:00:00Z");
        let want = DateTime::parse_from_rfc3339("2002-10-02T15:00:00+00:00").unwrap();
        assert_eq!(at.get(), Some(want));
    }

    #[test]
    fn timestamp_fraction_kept_but_not_displayed() {
        let at: Timestamp = "2002-10-02T15:00:00.05Z".parse().unwrap();
        assert_eq!(at.to_string(), "2002-10-02T15:00:00Z");
        assert_eq!(at.get().unwrap().timestamp_subsec_millis(), 50);
    }

    #[test]
    fn timestamp_invalid_resets() {
        let mut at: Timestamp = "2002-10-02T15:00:00Z".parse().unwrap();
        let err = at.set("yesterday").unwrap_err();
        assert!(err.to_string().starts_with(r#"parsing time "yesterday": "#), "{err}");
        assert_eq!(at.get(), None);
    }

    #[test]
    fn timestamp_requires_t_separator() {
        let mut at: Timestamp = "2002-10-02T15:00:00Z".parse().unwrap();
        let err = at.set("2002-10-02 15:00:00Z").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"parsing time "2002-10-02 15:00:00Z": expected 'T' between date and time"#
        );
        assert_eq!(at.get(), None);
        assert!("2002-10-02t15:00:00z".parse::<Timestamp>().is_ok());
    }

    // -- serde -----------------------------------------------------------------

    #[test]
    fn lists_serialize_as_sequences() {
        let list = StringList::from(strings(&["a", "b"]));
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
        let ints: IntList = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(ints.get(), [1, 2]);
    }

    #[test]
    fn url_and_timestamp_serialize_as_strings() {
        let url: Url = "https://foo.bar/baz".parse().unwrap();
        assert_eq!(serde_json::to_string(&url).unwrap(), r#""https://foo.bar/baz""#);
        let back: Url = serde_json::from_str(r#""https://foo.bar/baz""#).unwrap();
        assert_eq!(back, url);

        let at: Timestamp = serde_json::from_str(r#""2002-10-02T15:00:00Z""#).unwrap();
        assert_eq!(serde_json::to_string(&at).unwrap(), r#""2002-10-02T15:00:00Z""#);
        let unset: Timestamp = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(unset, Timestamp::default());
    }

    #[test]
    fn bad_strings_fail_to_deserialize() {
        assert!(serde_json::from_str::<Url>(r#""%""#).is_err());
        assert!(serde_json::from_str::<Timestamp>(r#""soon""#).is_err());
    }
}

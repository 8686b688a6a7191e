//! URL references: `scheme:[//[userinfo@]host]path[?query][#fragment]`.
//!
//! Both absolute URLs and relative references parse (`foo.bar` is a path,
//! `//foo.bar` a host). Percent-escapes are validated on the way in and the
//! decoded path and fragment are stored; [`Display`](fmt::Display) re-escapes
//! them, preferring the original spelling when it decodes to the same text.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

const FRAGMENT: &AsciiSet = &PATH
    .remove(b'?')
    .remove(b'!')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    #[error("missing protocol scheme")]
    MissingScheme,

    #[error("first path segment in URL cannot contain colon")]
    ColonInFirstSegment,

    #[error("invalid control character in URL")]
    ControlCharacter,

    #[error("invalid character {0:?} in host name")]
    InvalidHost(String),

    #[error("missing ']' in host")]
    UnclosedBracket,

    #[error("invalid port {0:?} after host")]
    InvalidPort(String),

    #[error("invalid userinfo")]
    InvalidUserinfo,
}

/// The components of a parsed URL reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Lower-cased scheme, empty for relative references.
    pub scheme: String,
    /// Everything after `scheme:` when it does not start with `/`.
    pub opaque: String,
    /// Raw `user[:password]` before the `@`, if present.
    pub userinfo: Option<String>,
    pub host: String,
    /// Decoded path.
    pub path: String,
    /// Original escaped path, only kept when it differs from the default encoding.
    pub raw_path: String,
    /// Query without the leading `?`, left encoded.
    pub raw_query: String,
    /// A trailing `?` with an empty query.
    pub force_query: bool,
    /// Decoded fragment.
    pub fragment: String,
    /// Original escaped fragment, only kept when it differs from the default encoding.
    pub raw_fragment: String,
}

impl UrlParts {
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (raw, None),
        };
        let mut url = Self::parse_reference(rest)?;
        if let Some(fragment) = fragment {
            url.fragment = unescape(fragment)?;
            if utf8_percent_encode(&url.fragment, FRAGMENT).to_string() != fragment {
                url.raw_fragment = fragment.to_string();
            }
        }
        Ok(url)
    }

    fn parse_reference(raw: &str) -> Result<Self, UrlError> {
        if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(UrlError::ControlCharacter);
        }

        let mut url = UrlParts::default();
        if raw == "*" {
            url.path = "*".to_string();
            return Ok(url);
        }

        let (scheme, rest) = split_scheme(raw)?;
        url.scheme = scheme.to_ascii_lowercase();

        let mut rest = match rest.split_once('?') {
            Some((head, "")) => {
                url.force_query = true;
                head
            }
            Some((head, query)) => {
                url.raw_query = query.to_string();
                head
            }
            None => rest,
        };

        if !rest.starts_with('/') {
            if !url.scheme.is_empty() {
                url.opaque = rest.to_string();
                return Ok(url);
            }
            let segment = rest.split('/').next().unwrap_or_default();
            if segment.contains(':') {
                return Err(UrlError::ColonInFirstSegment);
            }
        }

        let has_authority = rest.starts_with("//") && (!url.scheme.is_empty() || !rest.starts_with("///"));
        if has_authority {
            let authority = &rest[2..];
            let (authority, path) = match authority.find('/') {
                Some(i) => (&authority[..i], &authority[i..]),
                None => (authority, ""),
            };
            let (userinfo, host) = parse_authority(authority)?;
            url.userinfo = userinfo;
            url.host = host;
            rest = path;
        }

        url.path = unescape(rest)?;
        if utf8_percent_encode(&url.path, PATH).to_string() != rest {
            url.raw_path = rest.to_string();
        }
        Ok(url)
    }

    /// The path as it appears in the URL string.
    pub fn escaped_path(&self) -> String {
        if !self.raw_path.is_empty() && unescape(&self.raw_path).is_ok_and(|p| p == self.path) {
            return self.raw_path.clone();
        }
        if self.path == "*" {
            return "*".to_string();
        }
        utf8_percent_encode(&self.path, PATH).to_string()
    }

    pub fn escaped_fragment(&self) -> String {
        if !self.raw_fragment.is_empty()
            && unescape(&self.raw_fragment).is_ok_and(|f| f == self.fragment)
        {
            return self.raw_fragment.clone();
        }
        utf8_percent_encode(&self.fragment, FRAGMENT).to_string()
    }
}

impl fmt::Display for UrlParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        if !self.scheme.is_empty() {
            buf.push_str(&self.scheme);
            buf.push(':');
        }
        if !self.opaque.is_empty() {
            buf.push_str(&self.opaque);
        } else {
            let path = self.escaped_path();
            if !self.scheme.is_empty() || !self.host.is_empty() || self.userinfo.is_some() {
                if !self.host.is_empty() || !path.is_empty() || self.userinfo.is_some() {
                    buf.push_str("//");
                }
                if let Some(userinfo) = &self.userinfo {
                    buf.push_str(userinfo);
                    buf.push('@');
                }
                buf.push_str(&self.host);
            }
            if !path.is_empty() && !path.starts_with('/') && !self.host.is_empty() {
                buf.push('/');
            }
            if buf.is_empty() && path.split('/').next().is_some_and(|s| s.contains(':')) {
                buf.push_str("./");
            }
            buf.push_str(&path);
        }
        if self.force_query || !self.raw_query.is_empty() {
            buf.push('?');
            buf.push_str(&self.raw_query);
        }
        if !self.fragment.is_empty() {
            buf.push('#');
            buf.push_str(&self.escaped_fragment());
        }
        f.write_str(&buf)
    }
}

/// Splits off a leading `scheme:`. Input that does not start with a valid
/// scheme is returned whole as the rest.
fn split_scheme(raw: &str) -> Result<(&str, &str), UrlError> {
    for (i, c) in raw.bytes().enumerate() {
        match c {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
            b':' if i == 0 => return Err(UrlError::MissingScheme),
            b':' => return Ok((&raw[..i], &raw[i + 1..])),
            _ => return Ok(("", raw)),
        }
    }
    Ok(("", raw))
}

fn parse_authority(authority: &str) -> Result<(Option<String>, String), UrlError> {
    let (userinfo, host) = match authority.rfind('@') {
        Some(i) => (Some(&authority[..i]), &authority[i + 1..]),
        None => (None, authority),
    };
    let host = parse_host(host)?;
    let userinfo = match userinfo {
        Some(info) => {
            if !info.bytes().all(valid_userinfo_byte) {
                return Err(UrlError::InvalidUserinfo);
            }
            unescape(info)?;
            Some(info.to_string())
        }
        None => None,
    };
    Ok((userinfo, host))
}

fn parse_host(host: &str) -> Result<String, UrlError> {
    let colon_port = if host.starts_with('[') {
        let Some(i) = host.rfind(']') else {
            return Err(UrlError::UnclosedBracket);
        };
        &host[i + 1..]
    } else {
        host.rfind(':').map_or("", |i| &host[i..])
    };
    if !valid_optional_port(colon_port) {
        return Err(UrlError::InvalidPort(colon_port.to_string()));
    }
    if let Some(c) = host.chars().find(|c| c.is_ascii() && !valid_host_byte(*c as u8)) {
        return Err(UrlError::InvalidHost(c.to_string()));
    }
    unescape(host)
}

/// Empty, or `:` followed by digits only.
fn valid_optional_port(port: &str) -> bool {
    match port.strip_prefix(':') {
        Some(digits) => digits.bytes().all(|b| b.is_ascii_digit()),
        None => port.is_empty(),
    }
}

fn valid_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-_.~!$&'()*+,;=:[]<>\"%".contains(&b)
}

fn valid_userinfo_byte(b: u8) -> bool {
    !b.is_ascii() || b.is_ascii_alphanumeric() || b"-._:~!$&'()*+,;=%@".contains(&b)
}

/// Validates every `%XX` escape, then decodes.
fn unescape(s: &str) -> Result<String, UrlError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                let bad = String::from_utf8_lossy(&bytes[i..end]).into_owned();
                return Err(UrlError::InvalidEscape(bad));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(percent_decode_str(s).decode_utf8_lossy().into_owned())
}

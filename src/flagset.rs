//! Command-line flag parsing over registered [`Leaf`] slots.
//!
//! Flags are written `-name`, `--name`, `-name=value` or `-name value`.
//! Boolean flags never consume the following token, so a false value needs
//! `-name=false`. Parsing stops at the first non-flag token or after `--`.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Error;
use crate::slot::Leaf;

struct Flag<'a> {
    leaf: Leaf<'a>,
    usage: String,
    /// Baseline text at registration, used for the `(default ...)` note.
    default: String,
}

pub(crate) struct FlagSet<'a> {
    name: String,
    parent: Option<String>,
    flags: BTreeMap<String, Flag<'a>>,
    args: Vec<String>,
}

/// `-h`, `--h`, `-help` or `--help`.
pub(crate) fn is_help_token(token: &str) -> bool {
    matches!(token, "-h" | "--h" | "-help" | "--help")
}

impl<'a> FlagSet<'a> {
    pub(crate) fn new(name: &str, parent: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            flags: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    pub(crate) fn define(&mut self, name: String, leaf: Leaf<'a>, usage: String) -> Result<(), Error> {
        if self.flags.contains_key(&name) {
            return Err(Error::FlagRedefined(name));
        }
        let default = leaf.display();
        self.flags.insert(name, Flag { leaf, usage, default });
        Ok(())
    }

    /// Registered flag names in usage order.
    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// Positional arguments left over by the last [`parse`](Self::parse).
    pub(crate) fn into_args(self) -> Vec<String> {
        self.args
    }

    /// Parses `args`, writing the error message and usage to `out` on failure.
    ///
    /// An unregistered `-h`/`-help` prints usage and yields [`Error::Help`].
    pub(crate) fn parse(&mut self, args: &[&str], out: &mut dyn Write) -> Result<(), Error> {
        let mut rest = args;
        loop {
            match self.parse_one(&mut rest) {
                Ok(true) => {}
                Ok(false) => break,
                Err(Error::Help) => {
                    self.print_usage(out)?;
                    return Err(Error::Help);
                }
                Err(err) => {
                    writeln!(out, "{err}")?;
                    self.print_usage(out)?;
                    return Err(err);
                }
            }
        }
        self.args = rest.iter().map(|s| s.to_string()).collect();
        Ok(())
    }

    /// Consumes one flag from the front of `rest`. `Ok(false)` when no flags remain.
    fn parse_one(&mut self, rest: &mut &[&str]) -> Result<bool, Error> {
        let current = *rest;
        let Some((&token, tail)) = current.split_first() else {
            return Ok(false);
        };
        if token.len() < 2 || !token.starts_with('-') {
            return Ok(false);
        }
        let mut name = &token[1..];
        if let Some(stripped) = name.strip_prefix('-') {
            if stripped.is_empty() {
                *rest = tail;
                return Ok(false);
            }
            name = stripped;
        }
        if name.is_empty() || name.starts_with('-') || name.starts_with('=') {
            return Err(Error::BadFlagSyntax(token.to_string()));
        }
        *rest = tail;

        let (name, value) = match name.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (name, None),
        };
        let Some(flag) = self.flags.get_mut(name) else {
            if name == "h" || name == "help" {
                return Err(Error::Help);
            }
            return Err(Error::UndefinedFlag(name.to_string()));
        };

        if flag.leaf.is_bool() {
            let value = value.unwrap_or("true");
            flag.leaf.set(value).map_err(|source| Error::InvalidBooleanValue {
                flag: name.to_string(),
                value: value.to_string(),
                source,
            })?;
            return Ok(true);
        }

        let value = match value {
            Some(value) => value,
            None => {
                let current = *rest;
                let Some((&next, tail)) = current.split_first() else {
                    return Err(Error::MissingArgument(name.to_string()));
                };
                *rest = tail;
                next
            }
        };
        flag.leaf.set(value).map_err(|source| Error::InvalidFlagValue {
            flag: name.to_string(),
            value: value.to_string(),
            source,
        })?;
        Ok(true)
    }

    pub(crate) fn print_usage(&self, out: &mut dyn Write) -> Result<(), Error> {
        match (&self.parent, self.name.as_str()) {
            (Some(parent), name) => writeln!(out, "Usage of {parent} {name}:")?,
            (None, "") => writeln!(out, "Usage:")?,
            (None, name) => writeln!(out, "Usage of {name}:")?,
        }
        self.print_defaults(out)
    }

    /// One entry per flag, sorted by name:
    ///
    /// ```text
    ///   -port uint
    ///     	port (env APP_PORT) (default 3000)
    /// ```
    pub(crate) fn print_defaults(&self, out: &mut dyn Write) -> Result<(), Error> {
        for (name, flag) in &self.flags {
            let (hint, usage) = unquote_usage(&flag.leaf, &flag.usage);
            let mut line = format!("  -{name}");
            if !hint.is_empty() {
                line.push(' ');
                line.push_str(&hint);
            }
            // Short names share the line with their usage.
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage.replace('\n', "\n    \t"));
            if flag.default != flag.leaf.zero_display() {
                if flag.leaf.is_string() {
                    line.push_str(&format!(" (default {:?})", flag.default));
                } else {
                    line.push_str(&format!(" (default {})", flag.default));
                }
            }
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Pulls a back-quoted word out of `usage` to use as the type hint.
fn unquote_usage(leaf: &Leaf<'_>, usage: &str) -> (String, String) {
    if let Some(start) = usage.find('`')
        && let Some(len) = usage[start + 1..].find('`')
    {
        let hint = &usage[start + 1..start + 1 + len];
        let unquoted = format!("{}{}{}", &usage[..start], hint, &usage[start + 2 + len..]);
        return (hint.to_string(), unquoted);
    }
    (leaf.type_hint().to_string(), usage.to_string())
}

//! Bind command-line flags, environment variables and defaults into a typed
//! config struct. Define a struct, derive [`Config`], and go.
//!
//! ```ignore
//! #[derive(flagenv::Config, Default)]
//! struct AppConfig {
//!     #[config(def = "3000")]
//!     port: u32,
//!     #[config(help = "log verbosity")]
//!     log_level: String,
//! }
//!
//! let mut config = AppConfig::default();
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! if let Some(code) = Binder::new("myapp").parse(&mut config, &args)?.exit_code() {
//!     std::process::exit(code);
//! }
//! ```
//!
//! That single call registers `-port` and `-log-level` flags, reads
//! `MYAPP_PORT` and `MYAPP_LOG_LEVEL` from the environment, fills in the
//! `def` values, and leaves the positional arguments in
//! [`Binder::args()`].
//!
//! # Design: struct as source of truth
//!
//! Your config struct is the schema for everything. Every field is either a
//! **leaf** (a scalar value bound to one flag and one environment variable)
//! or a **record** (another [`Config`] struct whose fields are bound under a
//! name prefix). The derive walks fields depth-first in declaration order, so
//! usage output and error messages follow the struct layout.
//!
//! Per-field attributes override the derived names:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `#[config(flag = "name")]` | flag name, replacing the derived one |
//! | `#[config(env = "NAME")]` | environment variable, used verbatim |
//! | `#[config(help = "text")]` | usage text |
//! | `#[config(def = "value")]` | default, parsed like an environment value |
//!
//! # Layer precedence
//!
//! ```text
//! Field defaults        #[config(def = ...)], or the zero value
//!        ↑ overridden by
//! Environment vars      COMMAND_PATH_FIELD
//!        ↑ overridden by
//! Command-line flags    -path-field value
//! ```
//!
//! The default of a leaf is only parsed when its environment variable is
//! unset. A variable set to the empty string binds the zero value. A
//! malformed default is reported even if a flag would have overridden it.
//!
//! # Naming
//!
//! Names come from the record path down to the field, joined per layer:
//!
//! | Field path | Flag | Environment variable (command `cool`) |
//! |------------|------|---------------------------------------|
//! | `port` | `-port` | `COOL_PORT` |
//! | `db.mongo_hosts` | `-db-mongo-hosts` | `COOL_DB_MONGO_HOSTS` |
//!
//! An explicit `flag` or `env` on a leaf replaces its whole name, prefix
//! included. Names on record fields are ignored.
//!
//! # Supported types
//!
//! | Type | Flag syntax |
//! |------|-------------|
//! | `bool` | `-verbose`, `-verbose=false` (never consumes the next token) |
//! | `String` | any text |
//! | `u32`, `u64`, `i32`, `i64` | base-10 integers, range checked |
//! | `f64` | decimal or exponent notation, `inf`, `nan` |
//! | [`Duration`](std::time::Duration) | `300ms`, `1.5h`, `2h45m` |
//! | [`StringList`] | comma separated, `a,b,c` |
//! | [`IntList`] | comma separated integers, `1,2,3` |
//! | [`Url`] | any absolute or relative URL reference |
//! | [`Timestamp`] | RFC 3339, `2002-10-02T10:00:00-05:00` |
//!
//! Any other field type fails the whole bind with
//! [`ValueError::UnsupportedType`] when it is registered. Custom types can
//! take part by implementing [`Bind`] and [`Config`] by hand.
//!
//! # Flag syntax
//!
//! Flags follow the conventions of Go's `flag` package: one or two leading
//! dashes are equivalent, values can be attached (`-port=8080`) or separate
//! (`-port 8080`). Parsing stops at the first non-flag argument or after a
//! lone `--`. Everything after that is returned by [`Binder::args()`].
//!
//! `-h`, `-help`, `--h` and `--help` print usage unless the config defines a
//! flag by that name. When any of them is present, environment variables are
//! not consulted, so the usage shows the static defaults.
//!
//! # Error handling
//!
//! [`ErrorHandling`] picks what a failed bind does:
//!
//! - **[`ContinueOnError`](ErrorHandling::ContinueOnError)** returns the
//!   [`Error`] to the caller.
//! - **[`ExitOnError`](ErrorHandling::ExitOnError)** (default) writes the
//!   error to the output sink and returns [`Outcome::Fatal`]. Use
//!   [`Outcome::exit_code()`] to end the process with status 2.
//! - **[`PanicOnError`](ErrorHandling::PanicOnError)** panics with the
//!   [`Error`] as payload.
//!
//! A help request is not an error: it returns [`Outcome::Help`] under the
//! first two policies.
//!
//! With the `rich-errors` feature, [`Error`] implements
//! `miette::Diagnostic`.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`BindArgs`], a clap derive struct that collects the raw tokens of a
//! subcommand so each subcommand can bind its own config. To use flagenv
//! without clap:
//!
//! ```toml
//! flagenv = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! The binder emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! each bind and its outcome, `trace` for every registered field. Install a
//! subscriber to see them.

extern crate self as flagenv;

pub mod error;
pub mod types;
pub mod url;
pub mod value;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod duration;
mod flagset;
mod naming;
mod slot;
mod walk;

#[cfg(test)]
mod fixtures;

pub use builder::{Binder, BinderBuilder};
#[cfg(feature = "clap")]
pub use cli::BindArgs;
pub use error::{Error, Origin, ValueError};
pub use flagenv_derive::Config;
pub use slot::{Bind, Leaf, Slot};
pub use types::{ErrorHandling, Outcome};
pub use url::{UrlError, UrlParts};
pub use value::{IntList, StringList, Timestamp, Url};
pub use walk::{Config, FieldSpec, Fields};

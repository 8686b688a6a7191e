//! The field walk: every [`Config`] lists its fields, and each field is either
//! recursed into or registered as a flag with its baseline already stored.

use tracing::{debug, trace};

use crate::error::{Error, Origin, ValueError};
use crate::flagset::FlagSet;
use crate::naming;
use crate::slot::{Bind, Slot};

/// A struct whose fields can be bound from flags, environment and defaults.
///
/// Usually derived:
///
/// ```
/// use flagenv::Config;
///
/// #[derive(Config, Default)]
/// struct Server {
///     #[config(def = "3000")]
///     port: u32,
///     #[config(help = "log `level`", env = "LOG_LEVEL")]
///     log_level: String,
/// }
/// ```
///
/// A hand-written impl passes each field, in declaration order, to
/// [`Fields::field`]:
///
/// ```
/// use flagenv::{Config, Error, FieldSpec, Fields};
///
/// #[derive(Default)]
/// struct Server {
///     port: u32,
/// }
///
/// impl Config for Server {
///     fn describe<'a>(&'a mut self, fields: &mut Fields<'a, '_>) -> Result<(), Error> {
///         fields.field(FieldSpec::new("port").def("3000"), &mut self.port)
///     }
/// }
/// ```
pub trait Config {
    fn describe<'a>(&'a mut self, fields: &mut Fields<'a, '_>) -> Result<(), Error>;
}

/// Static description of one field, as given by `#[config(...)]`.
///
/// Empty `flag`, `env` and `help` values count as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub flag: Option<&'static str>,
    pub env: Option<&'static str>,
    pub help: Option<&'static str>,
    pub def: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self { name, flag: None, env: None, help: None, def: None }
    }

    /// Use this flag name instead of the derived one.
    pub const fn flag(mut self, flag: &'static str) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Use this environment variable instead of the derived one.
    pub const fn env(mut self, env: &'static str) -> Self {
        self.env = Some(env);
        self
    }

    /// Usage text, replacing the phrase derived from the field path.
    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Value used when the environment variable is not set.
    pub const fn def(mut self, def: &'static str) -> Self {
        self.def = Some(def);
        self
    }
}

/// Receives the fields of a [`Config`] during a parse.
///
/// `'a` is the lifetime of the borrow of the config being bound.
pub struct Fields<'a, 'w> {
    flags: &'w mut FlagSet<'a>,
    command: &'w str,
    lookup_env: &'w dyn Fn(&str) -> Option<String>,
    help: bool,
    path: Vec<&'static str>,
}

impl<'a, 'w> Fields<'a, 'w> {
    pub(crate) fn new(
        flags: &'w mut FlagSet<'a>,
        command: &'w str,
        lookup_env: &'w dyn Fn(&str) -> Option<String>,
        help: bool,
    ) -> Self {
        Self { flags, command, lookup_env, help, path: Vec::new() }
    }

    /// Binds one field.
    ///
    /// Nested records are walked with the field name appended to the path.
    /// Leaves get their environment value, or their default, stored right
    /// away and are registered as a flag.
    pub fn field<T: Bind + ?Sized>(&mut self, spec: FieldSpec, value: &'a mut T) -> Result<(), Error> {
        match value.slot() {
            Slot::Record(record) => {
                self.path.push(spec.name);
                let result = record.describe(self);
                self.path.pop();
                result
            }
            Slot::Leaf(mut leaf) => {
                let env = naming::env_name(self.command, &self.path, &spec);
                let (origin, text) = self.baseline(&spec, &env);
                leaf.set_baseline(&text).map_err(|source| rejected(&spec, origin, source))?;
                let flag = naming::flag_name(&self.path, &spec);
                let usage = naming::usage(&self.path, &spec, &env);
                trace!(%flag, %env, %origin, "field registered");
                self.flags.define(flag, leaf, usage)
            }
            Slot::Unsupported(kind) => {
                let env = naming::env_name(self.command, &self.path, &spec);
                let (origin, _) = self.baseline(&spec, &env);
                Err(rejected(&spec, origin, ValueError::UnsupportedType(kind)))
            }
        }
    }

    /// Environment wins when set, except while printing help.
    fn baseline(&self, spec: &FieldSpec, env: &str) -> (Origin, String) {
        if !self.help
            && let Some(value) = (self.lookup_env)(env)
        {
            return (Origin::Env, value);
        }
        (Origin::Def, spec.def.unwrap_or_default().to_string())
    }
}

fn rejected(spec: &FieldSpec, origin: Origin, source: ValueError) -> Error {
    debug!(field = spec.name, %origin, error = %source, "field rejected");
    Error::Field { field: spec.name, origin, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Db, Nested};

    fn walk<C: Config>(
        config: &mut C,
        env: &dyn Fn(&str) -> Option<String>,
        help: bool,
    ) -> Result<Vec<String>, Error> {
        let mut flags = FlagSet::new("test", None);
        let mut fields = Fields::new(&mut flags, "test", env, help);
        config.describe(&mut fields)?;
        Ok(flags.names().map(str::to_string).collect())
    }

    #[test]
    fn field_spec_builders() {
        const SPEC: FieldSpec = FieldSpec::new("port").flag("p").env("PORT").help("port").def("1");
        assert_eq!(SPEC.name, "port");
        assert_eq!(SPEC.flag, Some("p"));
        assert_eq!(SPEC.env, Some("PORT"));
        assert_eq!(SPEC.help, Some("port"));
        assert_eq!(SPEC.def, Some("1"));
    }

    #[test]
    fn nested_fields_get_path_names() {
        let mut config = Nested::default();
        let names = walk(&mut config, &|_| None, false).unwrap();
        assert_eq!(names, ["db-mongo-hosts", "db-port", "name"]);
    }

    #[test]
    fn env_beats_default() {
        let mut config = Db::default();
        walk(&mut config, &|key| (key == "TEST_PORT").then(|| "2".to_string()), false).unwrap();
        assert_eq!(config.port, 2);
    }

    #[test]
    fn default_without_env() {
        let mut config = Db::default();
        walk(&mut config, &|_| None, false).unwrap();
        assert_eq!(config.port, 1);
    }

    #[test]
    fn help_mode_ignores_env() {
        let mut config = Db::default();
        walk(&mut config, &|_| Some("2".to_string()), true).unwrap();
        assert_eq!(config.port, 1);
    }

    #[test]
    fn env_error_names_origin() {
        let mut config = Db::default();
        let err = walk(&mut config, &|_| Some("a".to_string()), false).unwrap_err();
        assert!(err.to_string().starts_with(r#"port env: parsing uint "a": "#), "{err}");
    }

    #[test]
    fn first_failure_stops_the_walk() {
        struct Two {
            first: u32,
            second: u32,
        }
        impl Config for Two {
            fn describe<'a>(&'a mut self, fields: &mut Fields<'a, '_>) -> Result<(), Error> {
                fields.field(FieldSpec::new("first").def("x"), &mut self.first)?;
                fields.field(FieldSpec::new("second").def("2"), &mut self.second)
            }
        }

        let mut config = Two { first: 9, second: 9 };
        let err = walk(&mut config, &|_| None, false).unwrap_err();
        assert!(matches!(err, Error::Field { field: "first", origin: Origin::Def, .. }));
        assert_eq!(config.second, 9);
    }

    #[test]
    fn duplicate_flag_names_are_rejected() {
        struct Clash {
            a: String,
            b: String,
        }
        impl Config for Clash {
            fn describe<'a>(&'a mut self, fields: &mut Fields<'a, '_>) -> Result<(), Error> {
                fields.field(FieldSpec::new("a").flag("x"), &mut self.a)?;
                fields.field(FieldSpec::new("b").flag("x"), &mut self.b)
            }
        }

        let mut config = Clash { a: String::new(), b: String::new() };
        let err = walk(&mut config, &|_| None, false).unwrap_err();
        assert_eq!(err.to_string(), "flag redefined: x");
    }
}

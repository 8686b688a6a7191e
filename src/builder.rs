use std::io::{self, Write};

use tracing::debug;

use crate::error::Error;
use crate::flagset::{self, FlagSet};
use crate::slot::{Bind, Slot};
use crate::types::{ErrorHandling, Outcome};
use crate::walk::Fields;

type LookupEnv<'o> = Box<dyn Fn(&str) -> Option<String> + 'o>;

/// Binds command-line flags, environment variables and field defaults into a
/// [`Config`](crate::Config) struct, in that order of precedence.
///
/// ```ignore
/// let mut config = AppConfig::default();
/// let mut binder = Binder::new("myapp");
/// if let Some(code) = binder.parse(&mut config, &args)?.exit_code() {
///     std::process::exit(code);
/// }
/// ```
///
/// A binder can be reused: every [`parse()`](Self::parse) call starts from a
/// fresh flag set.
pub struct Binder<'o> {
    name: String,
    error_handling: ErrorHandling,
    output: Box<dyn Write + 'o>,
    lookup_env: LookupEnv<'o>,
    usage_prefix: Option<String>,
    help: bool,
    args: Vec<String>,
}

impl<'o> Binder<'o> {
    /// A binder with default options: [`ErrorHandling::ExitOnError`], usage
    /// on stderr, variables from the process environment.
    pub fn new(name: &str) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: &str) -> BinderBuilder<'o> {
        BinderBuilder::new(name)
    }

    /// The command name, used in usage output and as the environment variable prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments left after the flags of the last [`parse()`](Self::parse).
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Binds `config` from `args` (without the program name), the
    /// environment and the `def` values of its fields.
    ///
    /// Fields are visited depth-first in declaration order. Each leaf gets its
    /// environment variable if set, its default otherwise; flags on the command
    /// line are applied last. If `args` asks for help (`-h`, `-help`, with one
    /// or two dashes), environment variables are ignored so that usage shows
    /// the static defaults.
    ///
    /// `config` must be a [`Config`](crate::Config) record, otherwise
    /// [`Error::InvalidConfigType`] is reported. Errors are handled according
    /// to the configured [`ErrorHandling`].
    pub fn parse<T, S>(&mut self, config: &mut T, args: &[S]) -> Result<Outcome, Error>
    where
        T: Bind + ?Sized,
        S: AsRef<str>,
    {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        self.help = args.iter().any(|a| flagset::is_help_token(a));
        self.args.clear();
        debug!(command = %self.name, args = args.len(), help = self.help, "binding config");

        let result = self.bind(config, &args);
        self.finish(result)
    }

    fn bind<T: Bind + ?Sized>(&mut self, config: &mut T, args: &[&str]) -> Result<(), Error> {
        let Slot::Record(record) = config.slot() else {
            return Err(Error::InvalidConfigType);
        };

        let mut flags = FlagSet::new(&self.name, self.usage_prefix.as_deref());
        let mut fields = Fields::new(&mut flags, &self.name, &*self.lookup_env, self.help);
        record.describe(&mut fields)?;

        flags.parse(args, &mut *self.output)?;
        self.args = flags.into_args();
        Ok(())
    }

    fn finish(&mut self, result: Result<(), Error>) -> Result<Outcome, Error> {
        let outcome = match result {
            Ok(()) => Ok(Outcome::Continue),
            Err(err) => match self.error_handling {
                ErrorHandling::ContinueOnError if err.is_help() => Ok(Outcome::Help),
                ErrorHandling::ContinueOnError => Err(err),
                ErrorHandling::ExitOnError if self.help || err.is_help() => Ok(Outcome::Help),
                ErrorHandling::ExitOnError => {
                    if let Err(write_err) = writeln!(self.output, "{}: {err}", self.name) {
                        debug!(command = %self.name, error = %write_err, "error report not written");
                    }
                    Ok(Outcome::Fatal)
                }
                ErrorHandling::PanicOnError => std::panic::panic_any(err),
            },
        };
        match &outcome {
            Ok(outcome) => debug!(command = %self.name, ?outcome, "config bound"),
            Err(err) => debug!(command = %self.name, error = %err, "config rejected"),
        }
        outcome
    }
}

/// Options for a [`Binder`].
pub struct BinderBuilder<'o> {
    name: String,
    error_handling: ErrorHandling,
    output: Option<Box<dyn Write + 'o>>,
    lookup_env: Option<LookupEnv<'o>>,
    usage_prefix: Option<String>,
}

impl<'o> BinderBuilder<'o> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            error_handling: ErrorHandling::default(),
            output: None,
            lookup_env: None,
            usage_prefix: None,
        }
    }

    /// Set the error handling policy (default: [`ErrorHandling::ExitOnError`]).
    pub fn error_handling(mut self, error_handling: ErrorHandling) -> Self {
        self.error_handling = error_handling;
        self
    }

    /// Where usage and error messages go (default: stderr).
    pub fn output(mut self, output: impl Write + 'o) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Replace the environment lookup (default: the process environment).
    ///
    /// Useful in tests, or to read variables from somewhere else:
    /// ```ignore
    /// let vars: HashMap<String, String> = load_dotenv()?;
    /// let binder = Binder::builder("myapp").lookup_env(|key| vars.get(key).cloned()).build();
    /// ```
    pub fn lookup_env(mut self, lookup_env: impl Fn(&str) -> Option<String> + 'o) -> Self {
        self.lookup_env = Some(Box::new(lookup_env));
        self
    }

    /// Name a parent command, so usage reads `Usage of <parent> <name>:`.
    pub fn usage(mut self, parent: &str) -> Self {
        self.usage_prefix = Some(parent.to_string());
        self
    }

    pub fn build(self) -> Binder<'o> {
        Binder {
            name: self.name,
            error_handling: self.error_handling,
            output: self.output.unwrap_or_else(|| Box::new(io::stderr())),
            lookup_env: self.lookup_env.unwrap_or_else(|| Box::new(process_env)),
            usage_prefix: self.usage_prefix,
            help: false,
            args: Vec::new(),
        }
    }
}

/// Reads `key` from the process environment. A value that is not valid
/// UTF-8 still counts as set and is decoded lossily.
fn process_env(key: &str) -> Option<String> {
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

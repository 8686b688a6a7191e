//! Clap adapter for flagenv.
//!
//! This module is the **optional integration layer** between flagenv and the
//! [clap](https://docs.rs/clap) CLI parser. It is compiled only when the
//! `clap` Cargo feature is enabled (on by default).
//!
//! Clap handles the outer command tree; each subcommand collects its raw
//! tokens into [`BindArgs`] and hands them to its own [`Binder`], so every
//! subcommand gets flag, environment and default binding for its config
//! struct:
//!
//! ```ignore
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(subcommand)]
//!     command: Commands,
//! }
//!
//! #[derive(Subcommand)]
//! enum Commands {
//!     #[command(disable_help_flag = true)]
//!     Serve(BindArgs),
//! }
//!
//! match Cli::parse().command {
//!     Commands::Serve(args) => {
//!         let mut config = ServeConfig::default();
//!         let mut binder = Binder::builder("serve").usage("myapp").build();
//!         args.bind(&mut binder, &mut config)?;
//!     }
//! }
//! ```
//!
//! `disable_help_flag` leaves `-h` to the binder, which prints the usage of
//! the config's flags instead of clap's.

use clap::Args;

use crate::builder::Binder;
use crate::error::Error;
use crate::slot::Bind;
use crate::types::Outcome;

/// Every token after a subcommand, hyphenated ones included, unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct BindArgs {
    /// Flags and arguments for this command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl BindArgs {
    /// Binds `config` from the collected tokens. Same as
    /// [`Binder::parse`] with `self.args`.
    pub fn bind<T: Bind + ?Sized>(
        &self,
        binder: &mut Binder<'_>,
        config: &mut T,
    ) -> Result<Outcome, Error> {
        binder.parse(config, &self.args)
    }
}

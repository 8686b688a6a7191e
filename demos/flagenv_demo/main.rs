//! # flagenv demo application
//!
//! A sample CLI tool that shows how to integrate flagenv into a real
//! application. Clap parses the subcommand; each subcommand binds its own
//! config struct from the remaining flags, `SERVE_*` / `MIGRATE_*` environment
//! variables and field defaults. This is **not** a real app.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagenv_demo -- serve
//! cargo run --example flagenv_demo -- serve -h
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                     |
//! |------------------------|------------------------------------------------------------------------|
//! | Field defaults         | `cargo run --example flagenv_demo -- serve`                            |
//! | Env var override       | `SERVE_PORT=8080 cargo run --example flagenv_demo -- serve`            |
//! | Nested env var         | `SERVE_MONGO_HOSTS=a,b cargo run --example flagenv_demo -- serve`      |
//! | Explicit env name      | `JWT_SECRET=s3cret cargo run --example flagenv_demo -- serve`          |
//! | Flag override          | `cargo run --example flagenv_demo -- serve -port 9000`                 |
//! | Nested flag            | `cargo run --example flagenv_demo -- serve --mongo-tls`                |
//! | Explicit flag name     | `cargo run --example flagenv_demo -- migrate -n`                       |
//! | Positional arguments   | `cargo run --example flagenv_demo -- migrate -n -- up down`            |
//! | Usage                  | `cargo run --example flagenv_demo -- serve -help`                      |
//! | Bad value              | `cargo run --example flagenv_demo -- serve -port nope`                 |
//! | Bind events            | `RUST_LOG=flagenv=trace cargo run --example flagenv_demo -- serve`     |

mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flagenv::{BindArgs, Binder, Config};

use config::{MigrateConfig, ServeConfig};

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// flagenv demo, a sample CLI app for showcasing flagenv integration.
#[derive(Parser, Debug)]
#[command(name = "flagenv-demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved server settings.
    #[command(disable_help_flag = true)]
    Serve(BindArgs),
    /// Print the migration plan.
    #[command(disable_help_flag = true)]
    Migrate(BindArgs),
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Binds `config` for subcommand `name`, or returns the exit code to stop with.
fn bind<T: Config>(name: &str, args: &BindArgs, config: &mut T) -> Result<Vec<String>, i32> {
    let mut binder = Binder::builder(name).usage("flagenv-demo").build();
    let outcome = args.bind(&mut binder, config).map_err(|e| {
        eprintln!("{name}: {e}");
        2
    })?;
    match outcome.exit_code() {
        Some(code) => Err(code),
        None => Ok(binder.args().to_vec()),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn serve(config: &ServeConfig) {
    let entries = [
        ("env", config.env.clone()),
        ("port", config.port.to_string()),
        ("mongo.hosts", config.mongo.hosts.to_string()),
        (
            "mongo.connection_timeout",
            format!("{:?}", config.mongo.connection_timeout),
        ),
        ("mongo.max_pool_size", config.mongo.max_pool_size.to_string()),
        ("mongo.tls", config.mongo.tls.to_string()),
        ("jwt.secret", "*".repeat(config.jwt.secret.len())),
        (
            "jwt.token_expiration",
            format!("{:?}", config.jwt.token_expiration),
        ),
        ("public_url", config.public_url.to_string()),
        ("start", config.start.to_string()),
    ];

    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &entries {
        println!("{key:<max_key_len$}  {value}");
    }
}

fn migrate(config: &MigrateConfig, steps: &[String]) {
    let target = config.database_url.get();
    let verb = if config.dry_run { "would apply" } else { "applying" };
    println!("database {} on {}", target.path.trim_start_matches('/'), target.host);
    if steps.is_empty() {
        println!("{verb}: all pending migrations");
    } else {
        println!("{verb}: {}", steps.join(", "));
    }
    if !config.only.0.is_empty() {
        println!("restricted to {}", config.only);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve(args) => {
            let mut config = ServeConfig::default();
            bind("serve", &args, &mut config).map(|_| serve(&config))
        }
        Commands::Migrate(args) => {
            let mut config = MigrateConfig::default();
            bind("migrate", &args, &mut config).map(|steps| migrate(&config, &steps))
        }
    };
    if let Err(code) = result {
        std::process::exit(code);
    }
}

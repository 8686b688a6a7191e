//! Configuration structs for the flagenv demo application.
//!
//! [`ServeConfig`] nests two records, [`MongoConfig`] and [`JwtConfig`], to
//! show how field paths turn into flag and environment variable names.
//! [`MigrateConfig`] is flat.
//!
//! # Name mapping
//!
//! The binder of each subcommand is named after it, so `serve` reads
//! `SERVE_*` variables:
//!
//! | Field                      | Flag                        | Env var                       |
//! |----------------------------|-----------------------------|-------------------------------|
//! | `env`                      | `-env`                      | `SERVE_ENV`                   |
//! | `port`                     | `-port`                     | `SERVE_PORT`                  |
//! | `mongo.hosts`              | `-mongo-hosts`              | `SERVE_MONGO_HOSTS`           |
//! | `mongo.connection_timeout` | `-mongo-connection-timeout` | `SERVE_MONGO_CONNECTION_TIMEOUT` |
//! | `jwt.secret`               | `-jwt-secret`               | `JWT_SECRET`                  |
//! | `public_url`               | `-public-url`               | `SERVE_PUBLIC_URL`            |
//! | `dry_run` (migrate)        | `-n`                        | `MIGRATE_DRY_RUN`             |

use std::time::Duration;

use flagenv::{Config, IntList, StringList, Timestamp, Url};

/// Settings for the `serve` subcommand.
#[derive(Config, Debug, Default)]
pub struct ServeConfig {
    #[config(help = "environment [development|production]", def = "development")]
    pub env: String,

    #[config(help = "`port` to listen on", def = "3000")]
    pub port: u32,

    pub mongo: MongoConfig,

    pub jwt: JwtConfig,

    #[config(help = "externally visible base URL", def = "http://localhost:3000/")]
    pub public_url: Url,

    #[config(help = "serve no requests before this instant")]
    pub start: Timestamp,
}

/// Database connection settings (nested record).
#[derive(Config, Debug, Default)]
pub struct MongoConfig {
    #[config(def = "localhost:27017")]
    pub hosts: StringList,

    #[config(def = "10s")]
    pub connection_timeout: Duration,

    #[config(def = "100")]
    pub max_pool_size: u64,

    pub tls: bool,
}

/// Token settings (nested record).
#[derive(Config, Debug, Default)]
pub struct JwtConfig {
    #[config(env = "JWT_SECRET")]
    pub secret: String,

    #[config(def = "24h")]
    pub token_expiration: Duration,
}

/// Settings for the `migrate` subcommand.
#[derive(Config, Debug, Default)]
pub struct MigrateConfig {
    #[config(help = "database `url`", def = "mongodb://localhost:27017/app")]
    pub database_url: Url,

    #[config(flag = "n", help = "print the plan without applying it")]
    pub dry_run: bool,

    #[config(help = "only run these migration numbers")]
    pub only: IntList,
}

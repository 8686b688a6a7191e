#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use crate::Config;
    use crate::value::{IntList, StringList, Timestamp, Url};

    #[derive(Config, Debug, Default, PartialEq)]
    pub struct Db {
        #[config(def = "1")]
        pub port: u32,
    }

    #[test]
    fn db_config_binds_default() {
        let mut config = Db::default();
        crate::Binder::builder("test")
            .lookup_env(|_| None)
            .build()
            .parse(&mut config, &[] as &[&str])
            .unwrap();
        assert_eq!(config, Db { port: 1 });
    }

    #[derive(Config, Debug, Default)]
    pub struct Unsupported {
        pub port: i16,
    }

    // -- Fixture for nested records ---------------------------------------------

    #[derive(Config, Debug, Default)]
    pub struct Mongo {
        pub hosts: StringList,
    }

    #[derive(Config, Debug, Default)]
    pub struct Cluster {
        pub port: u32,
        pub mongo: Mongo,
    }

    #[derive(Config, Debug, Default)]
    pub struct Nested {
        pub name: String,
        pub db: Cluster,
    }

    // -- Fixture for explicit flag, env and help names -------------------------

    #[derive(Config, Debug, Default)]
    pub struct Something {
        pub why: StringList,
        pub not: IntList,
        pub url: Url,
    }

    #[derive(Config, Debug, Default)]
    pub struct Log {
        #[config(flag = "foo")]
        pub log_level: String,
        #[config(env = "FOO")]
        pub verbose: bool,
        pub something: Something,
    }

    #[derive(Config, Debug, Default)]
    pub struct Overrides {
        pub log: Log,
        #[config(help = "bar")]
        pub expiration: Duration,
        pub number_1: i32,
        #[config(def = "5")]
        pub number_2: i64,
        pub number_3: f64,
        pub number_4: u32,
        pub number_5: u64,
    }

    // -- Fixture for a complete service ----------------------------------------

    #[derive(Config, Debug, Default)]
    pub struct MongoSettings {
        #[config(def = "mongo")]
        pub hosts: StringList,
        #[config(def = "10s")]
        pub connection_timeout: Duration,
        pub replica_set: String,
        #[config(def = "100")]
        pub max_pool_size: u64,
        pub tls: bool,
        pub username: String,
        pub password: String,
        #[config(def = "cool")]
        pub database: String,
    }

    #[derive(Config, Debug, Default)]
    pub struct Jwt {
        pub secret: String,
        #[config(def = "24h")]
        pub token_expiration: Duration,
        #[config(def = "168h")]
        pub refresh_token_expiration: Duration,
    }

    #[derive(Config, Debug, Default)]
    pub struct Aws {
        #[config(def = "eu-central-1")]
        pub region: String,
    }

    #[derive(Config, Debug, Default)]
    pub struct Service {
        #[config(help = "environment [development|production]", def = "development")]
        pub env: String,
        #[config(def = "3000")]
        pub port: u32,
        pub mongo: MongoSettings,
        pub jwt: Jwt,
        pub aws: Aws,
        #[config(def = "2002-10-02T10:00:00-05:00")]
        pub start: Timestamp,
    }
}

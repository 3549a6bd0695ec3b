use std::env;

use log::info;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
}

impl Config {
    /// Reads configuration from environment variables, with defaults that
    /// match the local development setup.
    pub fn from_env() -> Self {
        let port = var_or("PORT", "5000").parse().unwrap_or(5000);

        let database = DatabaseConfig {
            host: var_or("DB_HOST", "localhost"),
            port: var_or("DB_PORT", "5432").parse().unwrap_or(5432),
            dbname: var_or("DB_NAME", "edupath_db"),
            user: var_or("DB_USER", "edupath_user"),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
        };

        Config { port, database }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

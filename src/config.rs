use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::api::DEFAULT_API_URL;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub user_id: i64,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

pub fn load() -> AppResult<Config> {
    let database_url =
        env::var("MEGASENA_DB_PATH").unwrap_or_else(|_| "data/megasena.db".to_string());
    let api_base_url =
        env::var("MEGASENA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

    Ok(Config {
        database_url,
        api_base_url,
        http_timeout_secs: numeric_var("MEGASENA_HTTP_TIMEOUT_SECS", 10)?,
        cache_ttl_secs: numeric_var("MEGASENA_CACHE_TTL_SECS", 600)?,
        user_id: numeric_var("MEGASENA_USER_ID", 1)?,
    })
}

fn numeric_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

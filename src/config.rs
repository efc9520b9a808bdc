use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    /// Upper bound for a single store call made by a handler.
    pub store_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://taskdeck.db".to_string(),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            max_connections: 5,
            store_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: parse_var(&lookup, "TASKDECK_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "TASKDECK_PORT")?.unwrap_or(defaults.port),
            max_connections: parse_var(&lookup, "TASKDECK_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            store_timeout: parse_var(&lookup, "TASKDECK_STORE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.store_timeout),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.database_url, "sqlite://taskdeck.db");
        assert_eq!(cfg.addr().to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.store_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("TASKDECK_HOST", "0.0.0.0"),
            ("TASKDECK_PORT", "8080"),
            ("TASKDECK_STORE_TIMEOUT_SECS", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.store_timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup(&[("TASKDECK_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("TASKDECK_PORT"));
    }
}

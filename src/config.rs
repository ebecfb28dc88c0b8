//! Worker configuration.
//!
//! Built once at startup and handed to the collaborators explicitly; nothing
//! else in the crate reads the process environment.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::storage::SupabaseConfig;

const DEFAULT_BUCKET: &str = "forms";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKER_COUNT: usize = 4;
const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub supabase: SupabaseConfig,
    pub bind_address: String,
    pub port: u16,
    /// Number of jobs processed concurrently.
    pub worker_count: usize,
    /// Number of accepted jobs allowed to wait for a worker.
    pub queue_capacity: usize,
    /// Bearer token callers must present on `/generate-form`, if set.
    pub auth_token: Option<String>,
}

impl WorkerConfig {
    pub fn new(supabase: SupabaseConfig) -> Self {
        Self {
            supabase,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            auth_token: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase = SupabaseConfig {
            supabase_url: required(&lookup, "SUPABASE_URL")?,
            service_role_key: required(&lookup, "SUPABASE_SERVICE_ROLE_KEY")?,
            bucket_name: lookup("FORMS_BUCKET")
                .filter(|bucket| !bucket.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        };

        let auth_token = lookup("WORKER_AUTH_TOKEN").filter(|token| !token.trim().is_empty());
        if auth_token.is_none() {
            log::warn!("WORKER_AUTH_TOKEN not set, /generate-form accepts unauthenticated requests");
        }

        Ok(Self {
            supabase,
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: parsed(&lookup, "PORT", DEFAULT_PORT)?,
            worker_count: positive(
                parsed(&lookup, "WORKER_COUNT", DEFAULT_WORKER_COUNT)?,
                "WORKER_COUNT",
            )?,
            queue_capacity: positive(
                parsed(&lookup, "JOB_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?,
                "JOB_QUEUE_CAPACITY",
            )?,
            auth_token,
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn positive(value: usize, name: &'static str) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if values are missing or
//! unparseable. The cook duration and poll interval are deliberately not
//! here; those are fixed, not deployment knobs.

use crate::error::{Error, Result};
use crate::model::BatchPolicy;

pub const DEFAULT_OVEN_COUNT: u32 = 4;
pub const DEFAULT_CHICKENS_PER_SKEWER: u32 = 4;

#[derive(Debug)]
pub struct Config {
    /// Base URL of the remote store.
    pub store_url: String,
    /// Number of oven slots on the board.
    pub oven_count: u32,
    /// How the batch-size input converts into a chicken count.
    pub batch_policy: BatchPolicy,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let batch_policy = match std::env::var("OVENBOARD_BATCH_UNIT").as_deref() {
            Err(_) | Ok("chickens") => BatchPolicy::Chickens,
            Ok("skewers") => BatchPolicy::Skewers {
                chickens_per_skewer: parsed_var(
                    "OVENBOARD_CHICKENS_PER_SKEWER",
                    DEFAULT_CHICKENS_PER_SKEWER,
                )?,
            },
            Ok(other) => {
                return Err(Error::Config(format!(
                    "OVENBOARD_BATCH_UNIT must be \"chickens\" or \"skewers\", got \"{other}\""
                )));
            }
        };

        Ok(Self {
            store_url: required_var("OVENBOARD_STORE_URL")?,
            oven_count: parsed_var("OVENBOARD_OVENS", DEFAULT_OVEN_COUNT)?,
            batch_policy,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("environment variable {name} is not valid: {raw}"))),
    }
}

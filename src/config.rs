//! Runtime configuration, read from the environment once at start-up.

use crate::sources::RequestContext;
use anyhow::{Context, Result};
use std::time::Duration;

pub const API_URL_VAR: &str = "RENTAL_SCOUT_API_URL";
pub const TOKEN_VAR: &str = "RENTAL_SCOUT_TOKEN";
pub const TIMEOUT_VAR: &str = "RENTAL_SCOUT_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub request: RequestContext,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let request = RequestContext::new(&api_url)
            .with_context(|| format!("{} is not a usable URL", API_URL_VAR))?
            .with_token(lookup(TOKEN_VAR));

        let timeout_secs = match lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_VAR, raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            anyhow::bail!("{} must be greater than zero", TIMEOUT_VAR);
        }

        Ok(Self {
            request,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

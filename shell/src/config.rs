use anyhow::{bail, Context, Result};
use todo_core::FailurePolicy;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Origin serving `/api/todos` (`TODO_API_URL`).
    pub api_url: String,
    /// Which failures are shown to the user (`TODO_FAILURE_POLICY`).
    pub policy: FailurePolicy,
}

impl ShellConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("TODO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("TODO_API_URL must be an http(s) url, got {api_url:?}");
        }

        let policy = match lookup("TODO_FAILURE_POLICY") {
            Some(raw) => raw.parse().context("invalid TODO_FAILURE_POLICY")?,
            None => FailurePolicy::default(),
        };

        Ok(Self { api_url, policy })
    }
}

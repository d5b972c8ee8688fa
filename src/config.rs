use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::Result;

/// Process configuration resolved from CLI flags and environment.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Address the export API listens on
    pub listen: SocketAddr,
    /// Namespace names omitted from every snapshot
    pub excludes: BTreeSet<String>,
    /// Deadline for a single snapshot request
    pub request_timeout: Duration,
}

impl Settings {
    /// Build settings from raw flag values.
    ///
    /// Exclude entries are trimmed and empty entries dropped, so both
    /// repeated `--exclude` flags and a comma-separated env value
    /// normalize to the same set.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `listen` is not a valid socket address
    pub fn new(listen: &str, excludes: Vec<String>, request_timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            listen: listen.parse()?,
            excludes: normalize_excludes(excludes),
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

fn normalize_excludes(excludes: Vec<String>) -> BTreeSet<String> {
    excludes
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

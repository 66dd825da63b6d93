//! Configuration module for sitewatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the web server binds to (default: "127.0.0.1")
    pub host: String,
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Path to the URL list, one target per line (default: "urls.txt")
    pub urls_path: String,
    /// Path the last batch result is written to (default: "status.json")
    pub snapshot_path: String,
    /// Whether `/status` writes a snapshot after each batch (default: true)
    pub persist_snapshot: bool,
    /// Per-request HTTP timeout (default: 8s)
    pub probe_timeout: Duration,
    /// Optional bound on name resolution. Unset means the system resolver's own limits.
    pub dns_timeout: Option<Duration>,
    /// Maximum number of targets checked at once (default: 16)
    pub concurrency: usize,
    /// Optional deadline for a whole batch.
    pub batch_deadline: Option<Duration>,
    /// Optional file replacing the built-in soft-failure signatures.
    pub signatures_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8080,
            urls_path: "urls.txt".to_string(),
            snapshot_path: "status.json".to_string(),
            persist_snapshot: true,
            probe_timeout: Duration::from_secs(8),
            dns_timeout: None,
            concurrency: 16,
            batch_deadline: None,
            signatures_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SITEWATCH_HOST`: bind address (default: 127.0.0.1)
    /// - `SITEWATCH_HTTP_PORT`: HTTP port (default: 8080)
    /// - `SITEWATCH_URLS_PATH`: URL list path (default: "urls.txt")
    /// - `SITEWATCH_SNAPSHOT_PATH`: snapshot path (default: "status.json")
    /// - `SITEWATCH_PERSIST`: write a snapshot after each query (default: true)
    /// - `SITEWATCH_PROBE_TIMEOUT_SECS`: HTTP timeout in seconds (default: 8)
    /// - `SITEWATCH_DNS_TIMEOUT_SECS`: resolution timeout in seconds (default: unset)
    /// - `SITEWATCH_CONCURRENCY`: worker pool size, 1 = sequential (default: 16)
    /// - `SITEWATCH_BATCH_DEADLINE_SECS`: whole-batch deadline in seconds (default: unset)
    /// - `SITEWATCH_SIGNATURES_PATH`: signature phrase file (default: built-in list)
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("SITEWATCH_HOST") {
            cfg.host = host;
        }

        if let Some(port) = parse_var("SITEWATCH_HTTP_PORT") {
            cfg.http_port = port;
        }

        if let Ok(path) = env::var("SITEWATCH_URLS_PATH") {
            cfg.urls_path = path;
        }

        if let Ok(path) = env::var("SITEWATCH_SNAPSHOT_PATH") {
            cfg.snapshot_path = path;
        }

        if let Some(persist) = parse_var("SITEWATCH_PERSIST") {
            cfg.persist_snapshot = persist;
        }

        if let Some(secs) = parse_secs("SITEWATCH_PROBE_TIMEOUT_SECS") {
            cfg.probe_timeout = secs;
        }

        cfg.dns_timeout = parse_secs("SITEWATCH_DNS_TIMEOUT_SECS");

        if let Some(n) = parse_var::<usize>("SITEWATCH_CONCURRENCY") {
            cfg.concurrency = n.max(1);
        }

        cfg.batch_deadline = parse_secs("SITEWATCH_BATCH_DEADLINE_SECS");

        if let Ok(path) = env::var("SITEWATCH_SIGNATURES_PATH") {
            if !path.trim().is_empty() {
                cfg.signatures_path = Some(path);
            }
        }

        cfg
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_secs(name: &str) -> Option<Duration> {
    parse_var::<f64>(name)
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
}

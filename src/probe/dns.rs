//! DNS resolvability check using the system resolver.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::{Host, Url};

use super::Resolver;

/// Resolves a target's host through the system resolver.
#[derive(Debug, Clone, Default)]
pub struct DnsResolver {
    timeout: Option<Duration>,
}

impl DnsResolver {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Resolver for DnsResolver {
    async fn resolve(&self, target: &str) -> bool {
        let Some((host, port)) = host_and_port(target) else {
            debug!("No host in target {}", target);
            return false;
        };

        let domain = match host {
            Host::Ipv4(_) | Host::Ipv6(_) => return true,
            Host::Domain(domain) => domain,
        };

        let lookup = tokio::net::lookup_host((domain.as_str(), port));
        let addrs = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    debug!("Lookup for {} timed out after {:?}", domain, timeout);
                    return false;
                }
            },
            None => lookup.await,
        };

        match addrs {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                debug!("Lookup for {} failed: {}", domain, e);
                false
            }
        }
    }
}

/// Extract the host and effective port of a target URL.
///
/// Returns `None` when the target does not parse or carries no host.
pub fn host_and_port(target: &str) -> Option<(Host<String>, u16)> {
    let url = Url::parse(target.trim()).ok()?;
    let host = url.host()?.to_owned();
    if let Host::Domain(domain) = &host {
        if domain.is_empty() {
            return None;
        }
    }
    let port = url.port_or_known_default().unwrap_or(80);
    Some((host, port))
}

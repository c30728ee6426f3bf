//! Reverse DNS for session urls.
//!
//! After a client connects, its peer address is looked up; on success the
//! session url becomes `hostname:port`.

use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use std::net::SocketAddr;
use tracing::debug;

/// Reverse-DNS resolver shared by all connections.
#[derive(Clone)]
pub struct HostnameResolver {
    resolver: TokioResolver,
}

impl HostnameResolver {
    /// Create a resolver from the system configuration, falling back to the
    /// library defaults.
    pub fn new() -> Self {
        let resolver = TokioResolver::builder_tokio()
            .map(|b| b.build())
            .unwrap_or_else(|_| {
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            });

        Self { resolver }
    }

    /// `hostname:port` for `peer`, or `None` when the lookup fails or
    /// returns nothing usable.
    pub async fn session_url(&self, peer: SocketAddr) -> Option<String> {
        match self.resolver.reverse_lookup(peer.ip()).await {
            Ok(lookup) => {
                let hostname = lookup.iter().next().map(|ptr| ptr.0.to_utf8())?;
                hostname_url(&hostname, peer.port())
            }
            Err(e) => {
                debug!(peer = %peer, error = %e, "Reverse lookup failed");
                None
            }
        }
    }
}

impl Default for HostnameResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a session url from a PTR answer, dropping the root label.
fn hostname_url(hostname: &str, port: u16) -> Option<String> {
    let hostname = hostname.trim_end_matches('.');
    if hostname.is_empty() {
        None
    } else {
        Some(format!("{hostname}:{port}"))
    }
}

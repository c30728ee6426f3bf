//! Admin provisioning blocks.

use serde::Deserialize;
use wschat_proto::glob;

/// Grants server-admin rights to sessions connecting from matching urls.
///
/// ```toml
/// [[admin]]
/// mask = "127.0.0.1:*"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBlock {
    /// Glob pattern matched against the session url (`host:port`, or
    /// `hostname:port` once reverse DNS has resolved it).
    pub mask: String,
}

impl AdminBlock {
    /// Check whether a session url falls under this block.
    pub fn matches(&self, url: &str) -> bool {
        glob::matches(url, &self.mask)
    }
}

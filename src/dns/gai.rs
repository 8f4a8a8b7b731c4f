//! System DNS resolver using getaddrinfo.
//!
//! Used as the default DNS strategy of a client and to bootstrap a DoH
//! server's own hostname when a provider has no usable bootstrap addresses.
//! Resolution runs on tokio's blocking pool so the async runtime is never
//! stalled by `getaddrinfo`.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::net::{SocketAddr, ToSocketAddrs};

/// System DNS resolver using `getaddrinfo` in a thread pool.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<SocketAddr>>())
                    .dns_context(&host)
            })
            .await;

            // Join error means the blocking task panicked or was cancelled.
            let addrs = result.map_err(|e| {
                tracing::error!(error = %e, "DNS resolution task failed");
                NetError::NameNotResolved
            })??;

            tracing::debug!(domain = %name, count = addrs.len(), "system resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

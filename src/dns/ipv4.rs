//! IPv4-only filtering.
//!
//! Resolvers built by this crate deliberately return IPv4 only, for users on
//! networks where IPv6 is broken or blocked. Filtering happens twice: on the
//! bootstrap addresses before a DoH client is built ([`ipv4_only`]), and on
//! every answer ([`Ipv4OnlyResolver`]). The second stage holds even if the
//! first was bypassed or the server returns mixed-family answers.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Keeps the IPv4 entries of `addrs`, in order. IPv6 entries are dropped.
pub fn ipv4_only(addrs: &[IpAddr]) -> Vec<Ipv4Addr> {
    addrs
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) => Some(*v4),
            IpAddr::V6(v6) => {
                tracing::debug!(addr = %v6, "discarding IPv6 bootstrap address");
                None
            }
        })
        .collect()
}

/// Decorator that strips IPv6 addresses from another resolver's answers.
///
/// Errors from the inner resolver pass through untouched. A name with only
/// IPv6 records yields an empty, successful answer.
#[derive(Clone)]
pub struct Ipv4OnlyResolver<R> {
    inner: R,
}

impl<R: Resolve> Ipv4OnlyResolver<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// The wrapped resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Resolves `name` to a list of IPv4 addresses.
    pub async fn lookup_ipv4(&self, name: impl Into<Name>) -> Result<Vec<Ipv4Addr>, NetError> {
        let addrs = self.resolve(name.into()).await?;
        Ok(addrs
            .filter_map(|addr| match addr {
                SocketAddr::V4(v4) => Some(*v4.ip()),
                SocketAddr::V6(_) => None,
            })
            .collect())
    }
}

impl<R: Resolve> Resolve for Ipv4OnlyResolver<R> {
    fn resolve(&self, name: Name) -> Resolving {
        let resolving = self.inner.resolve(name);
        Box::pin(async move {
            let addrs = resolving.await?;
            Ok(Box::new(addrs.filter(SocketAddr::is_ipv4)) as Addrs)
        })
    }
}

impl<R: fmt::Debug> fmt::Debug for Ipv4OnlyResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ipv4OnlyResolver").field(&self.inner).finish()
    }
}

//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that every
//! resolver in the crate (system, DoH, IPv4 filter, overrides) plugs into.

use crate::base::neterror::NetError;
use std::{
    collections::HashMap,
    fmt,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

/// A domain name to resolve into IP addresses.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Trait for DNS resolution.
///
/// This is the DNS strategy slot of a client: anything implementing it can
/// be installed with [`ClientBuilder::dns_resolver`](crate::client::ClientBuilder::dns_resolver).
/// Implementations must be thread-safe; `resolve` takes `&self` so one
/// instance serves concurrent lookups.
///
/// An empty iterator is a successful answer meaning "no route". Errors are
/// reserved for failures reaching or querying the server.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IP addresses.
    ///
    /// The returned addresses have port 0; callers set the port of the
    /// target service.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

/// Turns a list of IPs into port-0 [`Addrs`].
pub(crate) fn addrs_from_ips<I>(ips: I) -> Addrs
where
    I: IntoIterator<Item = IpAddr>,
{
    let addrs: Vec<SocketAddr> = ips.into_iter().map(|ip| SocketAddr::new(ip, 0)).collect();
    Box::new(addrs.into_iter())
}

/// DNS resolver wrapper that supports hostname overrides.
///
/// Checks a map of hostname-to-IP overrides before falling back to the
/// underlying resolver. Lookups are case-insensitive.
///
/// # Example
///
/// ```rust,ignore
/// use dohnet::dns::{DnsResolverWithOverrides, GaiResolver};
/// use std::collections::HashMap;
///
/// let mut overrides = HashMap::new();
/// overrides.insert("api.local".to_string(), vec!["127.0.0.1".parse().unwrap()]);
///
/// let resolver = DnsResolverWithOverrides::new(Arc::new(GaiResolver::new()), overrides);
/// ```
pub struct DnsResolverWithOverrides {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<String, Vec<IpAddr>>>,
}

impl DnsResolverWithOverrides {
    /// Creates a new resolver with the given overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback resolver for non-overridden hostnames.
    /// * `overrides` - Map of hostnames to their resolved addresses.
    pub fn new(inner: Arc<dyn Resolve>, overrides: HashMap<String, Vec<IpAddr>>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(host, ips)| (host.to_ascii_lowercase(), ips))
            .collect();
        Self {
            inner,
            overrides: Arc::new(overrides),
        }
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Resolve for DnsResolverWithOverrides {
    fn resolve(&self, name: Name) -> Resolving {
        let key = name.as_str().to_ascii_lowercase();
        if let Some(ips) = self.overrides.get(&key) {
            tracing::trace!(domain = %name, "dns override hit");
            let addrs = addrs_from_ips(ips.iter().copied());
            return Box::pin(std::future::ready(Ok(addrs)));
        }
        self.inner.resolve(name)
    }
}

impl fmt::Debug for DnsResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

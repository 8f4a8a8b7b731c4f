//! HTTP client configuration with a pluggable DNS strategy.
//!
//! The networking layer that actually opens connections lives elsewhere;
//! this module owns the part of a client it needs from DNS: transport
//! settings used to build a DoH channel, and the resolver every connection
//! target goes through.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohnet::client::Client;
//! use std::time::Duration;
//!
//! let client = Client::builder()
//!     .timeout(Duration::from_secs(5))
//!     .doh_cloudflare()?
//!     .build();
//!
//! let targets = client.resolve_target("example.com", 443).await?;
//! ```

use crate::base::neterror::NetError;
use crate::dns::{
    build_doh_resolver, DnsResolverWithOverrides, DohProvider, GaiResolver, Name,
    ProviderEndpoint, Resolve,
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

/// Transport settings and DNS strategy of a client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Upper bound for a single DNS lookup.
    pub timeout: Duration,

    /// DNS query attempts per lookup.
    pub dns_attempts: usize,

    /// Entries in the DoH response cache.
    pub dns_cache_size: usize,

    /// Custom DNS resolver (None = use GaiResolver).
    pub dns_resolver: Option<Arc<dyn Resolve>>,

    /// DNS hostname overrides (hostname -> addresses).
    pub dns_overrides: HashMap<String, Vec<IpAddr>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            dns_attempts: 2,
            dns_cache_size: 64,
            dns_resolver: None,
            dns_overrides: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("timeout", &self.timeout)
            .field("dns_attempts", &self.dns_attempts)
            .field("dns_cache_size", &self.dns_cache_size)
            .field("dns_resolver", &self.dns_resolver.is_some())
            .field("dns_overrides_count", &self.dns_overrides.len())
            .finish()
    }
}

/// A configured client.
///
/// Use [`Client::builder()`] to configure and create a client.
#[derive(Clone)]
pub struct Client {
    resolver: Arc<dyn Resolve>,
    config: ClientConfig,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        ClientBuilder::default().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The DNS strategy used for connection targets.
    pub fn resolver(&self) -> &Arc<dyn Resolve> {
        &self.resolver
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves a connection target to socket addresses.
    ///
    /// IP literals (including bracketed IPv6) skip DNS. An empty result means
    /// there is no route to `host`; it is not an error.
    pub async fn resolve_target(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, NetError> {
        if let Some(ip) = parse_ip_literal(host) {
            return Ok(vec![SocketAddr::new(ip, port)]);
        }

        let addrs = self.resolver.resolve(Name::new(host)).await?;
        let targets: Vec<SocketAddr> = addrs
            .map(|mut addr| {
                addr.set_port(port);
                addr
            })
            .collect();

        if targets.is_empty() {
            tracing::debug!(host = %host, "no addresses for connection target");
        }
        Ok(targets)
    }
}

fn parse_ip_literal(host: &str) -> Option<IpAddr> {
    let trimmed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    trimmed.parse().ok()
}

/// Builder for creating a [`Client`].
#[derive(Default, Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Set the DNS lookup timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set DNS query attempts per lookup.
    pub fn dns_attempts(mut self, attempts: usize) -> Self {
        self.config.dns_attempts = attempts;
        self
    }

    /// Set the DoH response cache size.
    pub fn dns_cache_size(mut self, size: usize) -> Self {
        self.config.dns_cache_size = size;
        self
    }

    /// Pin `host` to fixed addresses, bypassing the DNS strategy.
    pub fn dns_override(mut self, host: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        self.config.dns_overrides.insert(host.into(), addrs);
        self
    }

    /// Install a DNS strategy.
    pub fn dns_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.config.dns_resolver = Some(resolver);
        self
    }

    /// Install an IPv4-only DoH resolver for `endpoint`.
    ///
    /// The resolver is built from the settings configured so far, so set
    /// timeouts before calling this. A resolver installed earlier becomes
    /// the bootstrap resolver for the DoH host.
    pub fn doh_endpoint(self, endpoint: &ProviderEndpoint) -> Result<Self, NetError> {
        let resolver = build_doh_resolver(endpoint, &self.config)?;
        tracing::info!(url = %endpoint.url(), "installing DoH resolver");
        Ok(self.dns_resolver(Arc::new(resolver)))
    }

    /// Install an IPv4-only DoH resolver for `provider`.
    pub fn doh(self, provider: DohProvider) -> Result<Self, NetError> {
        self.doh_endpoint(provider.endpoint())
    }

    /// Install an IPv4-only DoH resolver by preference number.
    pub fn doh_pref(self, pref: i32) -> Result<Self, NetError> {
        self.doh(DohProvider::try_from(pref)?)
    }

    /// Use Cloudflare DoH.
    pub fn doh_cloudflare(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Cloudflare)
    }

    /// Use Google DoH.
    pub fn doh_google(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Google)
    }

    /// Use AdGuard (unfiltered) DoH.
    pub fn doh_adguard(self) -> Result<Self, NetError> {
        self.doh(DohProvider::AdGuard)
    }

    /// Use Quad9 DoH.
    pub fn doh_quad9(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Quad9)
    }

    /// Use AliDNS DoH.
    pub fn doh_alidns(self) -> Result<Self, NetError> {
        self.doh(DohProvider::AliDns)
    }

    /// Use DNSPod DoH.
    pub fn doh_dnspod(self) -> Result<Self, NetError> {
        self.doh(DohProvider::DnsPod)
    }

    /// Use 360 DoH.
    pub fn doh_360(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Dns360)
    }

    /// Use Quad101 (TWNIC) DoH.
    pub fn doh_quad101(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Quad101)
    }

    /// Use Mullvad DoH.
    pub fn doh_mullvad(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Mullvad)
    }

    /// Use ControlD (free, unfiltered) DoH.
    pub fn doh_controld(self) -> Result<Self, NetError> {
        self.doh(DohProvider::ControlD)
    }

    /// Use Njalla DoH.
    pub fn doh_njalla(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Njalla)
    }

    /// Use Shecan DoH.
    pub fn doh_shecan(self) -> Result<Self, NetError> {
        self.doh(DohProvider::Shecan)
    }

    /// Use LibreDNS DoH.
    pub fn doh_libredns(self) -> Result<Self, NetError> {
        self.doh(DohProvider::LibreDns)
    }

    /// Settings configured so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let base_resolver: Arc<dyn Resolve> = self
            .config
            .dns_resolver
            .clone()
            .unwrap_or_else(|| Arc::new(GaiResolver::new()));

        let resolver: Arc<dyn Resolve> = if self.config.dns_overrides.is_empty() {
            base_resolver
        } else {
            Arc::new(DnsResolverWithOverrides::new(
                base_resolver,
                self.config.dns_overrides.clone(),
            ))
        };

        Client {
            resolver,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_parse_ip_literal() {
        assert_eq!(
            parse_ip_literal("192.0.2.1"),
            Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)))
        );
        assert_eq!(parse_ip_literal("[::1]"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert_eq!(parse_ip_literal("::1"), Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert_eq!(parse_ip_literal("example.com"), None);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.dns_attempts, 2);
        assert!(config.dns_resolver.is_none());
    }

    #[test]
    fn test_doh_pref_unknown() {
        let err = Client::builder().doh_pref(0).unwrap_err();
        assert_eq!(err, NetError::UnknownDohProvider(0));
    }

    #[test]
    fn test_doh_installs_resolver() {
        let builder = Client::builder().doh_mullvad().unwrap();
        assert!(builder.config().dns_resolver.is_some());
    }

    #[tokio::test]
    async fn test_resolve_target_literal_and_override() {
        let client = Client::builder()
            .dns_override("db.internal", vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))])
            .build();

        let literal = client.resolve_target("203.0.113.9", 8443).await.unwrap();
        assert_eq!(literal, vec!["203.0.113.9:8443".parse::<SocketAddr>().unwrap()]);

        let overridden = client.resolve_target("db.internal", 5432).await.unwrap();
        assert_eq!(overridden, vec!["10.0.0.5:5432".parse::<SocketAddr>().unwrap()]);
    }
}

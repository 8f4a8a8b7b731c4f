//! DNS-over-HTTPS resolver backed by hickory-dns.
//!
//! [`DohResolverBuilder`] turns a [`ProviderEndpoint`] plus a client's
//! transport settings into an [`Ipv4OnlyResolver<DohResolver>`]:
//!
//! 1. IPv6 bootstrap addresses are dropped, order is kept.
//! 2. One HTTPS name server is configured per remaining bootstrap address,
//!    using the URL's port, path and host (as TLS server name).
//! 3. The result is wrapped so answers are IPv4 only.
//!
//! With no usable bootstrap address the DoH host itself is looked up
//! through the client's DNS strategy (the system resolver by default) on
//! first use. That bootstrap runs at most once per resolver, and
//! concurrent first lookups wait on the same initialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohnet::client::ClientConfig;
//! use dohnet::dns::{DohProvider, DohResolverBuilder};
//!
//! let resolver = DohResolverBuilder::new(DohProvider::Quad9.endpoint().clone())
//!     .client(&ClientConfig::default())
//!     .build()?;
//! let addrs = resolver.lookup_ipv4("example.com").await?;
//! ```

use super::ipv4::{ipv4_only, Ipv4OnlyResolver};
use super::provider::ProviderEndpoint;
use super::resolve::addrs_from_ips;
use super::{DnsResolverWithOverrides, GaiResolver, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use crate::client::ClientConfig;
use hickory_resolver::{
    config::{LookupIpStrategy, NameServerConfig, ResolverConfig},
    name_server::TokioConnectionProvider,
    proto::{op::ResponseCode, xfer::Protocol, ProtoErrorKind},
    ResolveError, TokioResolver,
};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::sync::OnceCell;
use url::{Host, Url};

const DEFAULT_DOH_PATH: &str = "/dns-query";

/// Attempts beyond this are clamped; each attempt gets a share of the timeout.
pub const MAX_DNS_ATTEMPTS: usize = 16;

/// Builder for a DoH resolver, mirroring how a client builder is used.
pub struct DohResolverBuilder {
    endpoint: ProviderEndpoint,
    timeout: Duration,
    attempts: usize,
    cache_size: usize,
    bootstrap_resolver: Option<Arc<dyn Resolve>>,
}

impl DohResolverBuilder {
    /// Starts a builder for `endpoint` with default transport settings.
    pub fn new(endpoint: ProviderEndpoint) -> Self {
        let defaults = ClientConfig::default();
        Self {
            endpoint,
            timeout: defaults.timeout,
            attempts: defaults.dns_attempts,
            cache_size: defaults.dns_cache_size,
            bootstrap_resolver: None,
        }
    }

    /// Reads transport settings and the current DNS strategy from a client.
    ///
    /// The client's resolver and DNS overrides are used to bootstrap the DoH
    /// host when no bootstrap address survives filtering.
    pub fn client(mut self, config: &ClientConfig) -> Self {
        self.timeout = config.timeout;
        self.attempts = config.dns_attempts;
        self.cache_size = config.dns_cache_size;
        self.bootstrap_resolver = if config.dns_overrides.is_empty() {
            config.dns_resolver.clone()
        } else {
            let base = config
                .dns_resolver
                .clone()
                .unwrap_or_else(|| Arc::new(GaiResolver::new()));
            let wrapped: Arc<dyn Resolve> = Arc::new(DnsResolverWithOverrides::new(
                base,
                config.dns_overrides.clone(),
            ));
            Some(wrapped)
        };
        self
    }

    /// Sets the resolver used to look up the DoH host itself.
    pub fn bootstrap_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.bootstrap_resolver = Some(resolver);
        self
    }

    /// Builds the IPv4-only DoH resolver.
    ///
    /// Fails only if the endpoint URL is unusable; no network I/O happens
    /// here.
    pub fn build(self) -> Result<Ipv4OnlyResolver<DohResolver>, NetError> {
        let url = Url::parse(self.endpoint.url())?;
        if url.scheme() != "https" {
            return Err(NetError::DisallowedUrlScheme);
        }
        let host = url.host().ok_or(NetError::InvalidUrl)?.to_owned();
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
        let path = match url.path() {
            "" | "/" => DEFAULT_DOH_PATH.to_string(),
            path => path.to_string(),
        };

        let mut bootstrap = ipv4_only(self.endpoint.bootstrap());
        if bootstrap.is_empty() {
            if let Host::Ipv4(ip) = host {
                bootstrap.push(ip);
            }
        }

        tracing::debug!(
            url = %self.endpoint.url(),
            bootstrap = bootstrap.len(),
            "building DoH resolver"
        );

        let inner = DohInner {
            tls_name: host.to_string(),
            host,
            port,
            path,
            timeout: self.timeout,
            attempts: self.attempts.clamp(1, MAX_DNS_ATTEMPTS),
            cache_size: self.cache_size,
            bootstrap,
            bootstrap_resolver: self
                .bootstrap_resolver
                .unwrap_or_else(|| Arc::new(GaiResolver::new())),
            endpoint: self.endpoint,
            client: OnceCell::new(),
        };

        Ok(Ipv4OnlyResolver::new(DohResolver {
            inner: Arc::new(inner),
        }))
    }
}

/// Builds an IPv4-only DoH resolver for `endpoint` using `config`'s
/// transport settings.
pub fn build_doh_resolver(
    endpoint: &ProviderEndpoint,
    config: &ClientConfig,
) -> Result<Ipv4OnlyResolver<DohResolver>, NetError> {
    DohResolverBuilder::new(endpoint.clone()).client(config).build()
}

/// DNS-over-HTTPS resolver for a single endpoint.
///
/// Cheap to clone; clones share the hickory client and its cache. Returned
/// addresses may include IPv6 if the server sends them, which is why
/// builders hand it out wrapped in [`Ipv4OnlyResolver`].
#[derive(Clone)]
pub struct DohResolver {
    inner: Arc<DohInner>,
}

struct DohInner {
    endpoint: ProviderEndpoint,
    host: Host<String>,
    tls_name: String,
    port: u16,
    path: String,
    timeout: Duration,
    attempts: usize,
    cache_size: usize,
    bootstrap: Vec<Ipv4Addr>,
    bootstrap_resolver: Arc<dyn Resolve>,
    client: OnceCell<DohClient>,
}

struct DohClient {
    resolver: TokioResolver,
    name_servers: Vec<Ipv4Addr>,
}

impl DohResolver {
    /// The endpoint this resolver queries.
    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.inner.endpoint
    }

    /// The IPv4 addresses the DoH server is reached at.
    ///
    /// Triggers the system bootstrap lookup if it has not happened yet.
    pub async fn bootstrap_addrs(&self) -> Result<Vec<Ipv4Addr>, NetError> {
        Ok(self.client().await?.name_servers.clone())
    }

    async fn client(&self) -> Result<&DohClient, NetError> {
        self.inner
            .client
            .get_or_try_init(|| async move {
                let name_servers = if self.inner.bootstrap.is_empty() {
                    self.system_bootstrap().await?
                } else {
                    self.inner.bootstrap.clone()
                };
                Ok::<_, NetError>(DohClient {
                    resolver: self.inner.build_client(&name_servers),
                    name_servers,
                })
            })
            .await
    }

    async fn system_bootstrap(&self) -> Result<Vec<Ipv4Addr>, NetError> {
        let host = self.inner.tls_name.clone();
        let failed = || NetError::DnsSecureResolverHostnameResolutionFailed { host: host.clone() };

        if let Host::Ipv6(_) = self.inner.host {
            tracing::warn!(host = %host, "DoH host is an IPv6 literal, no IPv4 route");
            return Err(failed());
        }

        tracing::debug!(host = %host, "bootstrapping DoH host via system resolver");
        let addrs = self
            .inner
            .bootstrap_resolver
            .resolve(Name::new(host.as_str()))
            .await
            .map_err(|e| {
                tracing::warn!(host = %host, error = %e, "DoH bootstrap lookup failed");
                failed()
            })?;

        let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
        let v4 = ipv4_only(&ips);
        if v4.is_empty() {
            tracing::warn!(host = %host, "DoH bootstrap returned no IPv4 address");
            return Err(failed());
        }
        Ok(v4)
    }
}

impl DohInner {
    fn build_client(&self, name_servers: &[Ipv4Addr]) -> TokioResolver {
        let mut config = ResolverConfig::new();
        for ip in name_servers {
            let mut ns =
                NameServerConfig::new(SocketAddr::new(IpAddr::V4(*ip), self.port), Protocol::Https);
            ns.tls_dns_name = Some(self.tls_name.clone());
            ns.http_endpoint = Some(self.path.clone());
            ns.trust_negative_responses = true;
            config.add_name_server(ns);
        }

        let mut builder =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
        let opts = builder.options_mut();
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;
        // The whole lookup is bounded by `timeout`; split it across attempts.
        opts.timeout = self.timeout / u32::try_from(self.attempts).unwrap_or(u32::MAX);
        opts.attempts = self.attempts;
        opts.cache_size = self.cache_size as _;

        builder.build()
    }
}

impl Resolve for DohResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            let ips = tokio::time::timeout(resolver.inner.timeout, resolver.lookup(domain))
                .await
                .map_err(|_| {
                    tracing::debug!(domain = %domain, "DoH lookup timed out");
                    NetError::DnsTimedOut
                })??;

            tracing::debug!(domain = %domain, count = ips.len(), "DoH resolution complete");
            Ok(addrs_from_ips(ips))
        })
    }
}

impl DohResolver {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>, NetError> {
        let client = self.client().await?;
        tracing::debug!(domain = %domain, url = %self.inner.endpoint.url(), "resolving via DoH");

        match client.resolver.lookup_ip(domain).await {
            Ok(lookup) => Ok(lookup.iter().collect()),
            Err(e) => lookup_error(domain, &e),
        }
    }
}

/// Maps a failed hickory lookup.
///
/// NOERROR and NXDOMAIN without answers are an empty result. Any other
/// response code is a server failure.
fn lookup_error(domain: &str, err: &ResolveError) -> Result<Vec<IpAddr>, NetError> {
    let kind = err.proto().map(|proto| proto.kind());
    let mapped = match kind {
        Some(ProtoErrorKind::NoRecordsFound { response_code, .. }) => match response_code {
            ResponseCode::NoError | ResponseCode::NXDomain => {
                tracing::debug!(domain = %domain, "DoH lookup returned no records");
                return Ok(Vec::new());
            }
            _ => NetError::DnsServerFailed,
        },
        Some(
            ProtoErrorKind::FormError { .. }
            | ProtoErrorKind::BadQueryCount(_)
            | ProtoErrorKind::CharacterDataTooLong { .. }
            | ProtoErrorKind::DomainNameTooLong(_)
            | ProtoErrorKind::IncorrectRDataLengthRead { .. }
            | ProtoErrorKind::LabelBytesTooLong(_)
            | ProtoErrorKind::LabelOverlapsWithOther { .. }
            | ProtoErrorKind::PointerNotPriorToLabel { .. }
            | ProtoErrorKind::UnrecognizedLabelCode(_)
            | ProtoErrorKind::QueryCaseMismatch,
        ) => NetError::DnsMalformedResponse,
        Some(ProtoErrorKind::Timeout) => NetError::DnsTimedOut,
        _ => NetError::name_resolution_failed(domain, err.to_string()),
    };

    tracing::debug!(domain = %domain, error = %err, "DoH lookup failed");
    Err(mapped)
}

impl fmt::Debug for DohResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DohResolver")
            .field("url", &self.inner.endpoint.url())
            .field("bootstrap", &self.inner.bootstrap)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

//! DNS Module Tests
//!
//! Covers:
//! - `Ipv4OnlyResolver` over mock resolvers (mixed, IPv6-only, failing)
//! - Concurrent and repeated lookups through one resolver
//! - `DnsResolverWithOverrides` composed with IPv4 filtering
//! - DoH resolver construction for every provider

use dohnet::base::neterror::NetError;
use dohnet::client::ClientConfig;
use dohnet::dns::{
    build_doh_resolver, ipv4_only, Addrs, DnsResolverWithOverrides, DohProvider,
    Ipv4OnlyResolver, Name, Resolve, Resolving,
};

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

struct MockResolver {
    response: Result<Vec<IpAddr>, NetError>,
}

impl Resolve for MockResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        let response = self.response.clone();
        Box::pin(async move {
            let addrs: Vec<SocketAddr> = response?.into_iter().map(|ip| SocketAddr::new(ip, 0)).collect();
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

fn dual_stack() -> Vec<IpAddr> {
    vec![
        IpAddr::V4(Ipv4Addr::new(93, 184, 215, 14)),
        IpAddr::V6(Ipv6Addr::new(0x2606, 0x2800, 0x21f, 0xcb07, 0x6820, 0x80da, 0xaf6b, 0x8b2c)),
        IpAddr::V4(Ipv4Addr::new(93, 184, 215, 15)),
    ]
}

#[tokio::test]
async fn test_no_ipv6_ever_returned() {
    let resolver = Ipv4OnlyResolver::new(MockResolver {
        response: Ok(dual_stack()),
    });

    for host in ["example.com", "www.example.com", "cdn.example.net"] {
        let addrs: Vec<_> = resolver.resolve(Name::new(host)).await.unwrap().collect();
        assert!(addrs.iter().all(|a| a.is_ipv4()), "{host}");
        assert_eq!(addrs.len(), 2);
    }
}

#[tokio::test]
async fn test_ipv6_only_host_is_empty_not_error() {
    let resolver = Ipv4OnlyResolver::new(MockResolver {
        response: Ok(vec![IpAddr::V6(Ipv6Addr::LOCALHOST)]),
    });

    let addrs = resolver.lookup_ipv4("v6only.example").await.unwrap();
    assert!(addrs.is_empty());
}

#[tokio::test]
async fn test_resolution_error_surfaces() {
    let resolver = Ipv4OnlyResolver::new(MockResolver {
        response: Err(NetError::name_resolution_failed("example.com", "tls handshake failed")),
    });

    let err = resolver.lookup_ipv4("example.com").await.unwrap_err();
    assert!(err.is_resolution_error());
}

#[tokio::test]
async fn test_concurrent_and_repeated_lookups_agree() {
    let resolver = Arc::new(Ipv4OnlyResolver::new(MockResolver {
        response: Ok(dual_stack()),
    }));

    let lookups = (0..16).map(|_| {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.lookup_ipv4("example.com").await })
    });

    let results = futures::future::join_all(lookups).await;
    let first = results[0].as_ref().unwrap().clone().unwrap();
    for result in results {
        assert_eq!(result.unwrap().unwrap(), first);
    }
    assert_eq!(
        first,
        vec![Ipv4Addr::new(93, 184, 215, 14), Ipv4Addr::new(93, 184, 215, 15)]
    );
}

#[tokio::test]
async fn test_overrides_are_filtered_too() {
    let mut overrides = HashMap::new();
    overrides.insert(
        "pinned.example".to_string(),
        vec![IpAddr::V6(Ipv6Addr::LOCALHOST), IpAddr::V4(Ipv4Addr::LOCALHOST)],
    );

    let inner = DnsResolverWithOverrides::new(
        Arc::new(MockResolver {
            response: Ok(dual_stack()),
        }),
        overrides,
    );
    let resolver = Ipv4OnlyResolver::new(inner);

    let addrs = resolver.lookup_ipv4("pinned.example").await.unwrap();
    assert_eq!(addrs, vec![Ipv4Addr::LOCALHOST]);
}

#[test]
fn test_bootstrap_filter_keeps_order() {
    let mixed: Vec<IpAddr> = vec![
        "2606:4700:4700::1111".parse().unwrap(),
        "1.1.1.1".parse().unwrap(),
        "2606:4700:4700::1001".parse().unwrap(),
        "1.0.0.1".parse().unwrap(),
    ];
    assert_eq!(
        ipv4_only(&mixed),
        vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(1, 0, 0, 1)]
    );
}

#[tokio::test]
async fn test_every_provider_builds() {
    let config = ClientConfig::default();
    for provider in DohProvider::ALL {
        let resolver = build_doh_resolver(provider.endpoint(), &config).unwrap();
        assert_eq!(resolver.inner().endpoint(), provider.endpoint());

        let bootstrap: Vec<IpAddr> = resolver
            .inner()
            .bootstrap_addrs()
            .await
            .unwrap()
            .into_iter()
            .map(IpAddr::V4)
            .collect();
        assert_eq!(bootstrap.as_slice(), provider.endpoint().bootstrap(), "{provider}");
    }
}

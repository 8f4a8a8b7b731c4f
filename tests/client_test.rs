//! Tests for Client API and persisted settings.

use dohnet::base::neterror::NetError;
use dohnet::client::Client;
use dohnet::config::DohSettings;
use dohnet::dns::{Addrs, DohProvider, Name, Resolve, Resolving};
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

struct FixedResolver(Vec<IpAddr>);

impl Resolve for FixedResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        let addrs: Vec<SocketAddr> = self.0.iter().map(|ip| SocketAddr::new(*ip, 0)).collect();
        Box::pin(async move { Ok(Box::new(addrs.into_iter()) as Addrs) })
    }
}

#[test]
fn test_client_creation() {
    let client = Client::new();
    assert_eq!(client.config().timeout, Duration::from_secs(10));
}

#[test]
fn test_every_provider_installs() {
    for provider in DohProvider::ALL {
        let builder = Client::builder().doh(provider).unwrap();
        assert!(builder.config().dns_resolver.is_some(), "{provider}");
    }
}

#[test]
fn test_named_shorthands() {
    let builders = [
        Client::builder().doh_cloudflare(),
        Client::builder().doh_google(),
        Client::builder().doh_adguard(),
        Client::builder().doh_quad9(),
        Client::builder().doh_alidns(),
        Client::builder().doh_dnspod(),
        Client::builder().doh_360(),
        Client::builder().doh_quad101(),
        Client::builder().doh_mullvad(),
        Client::builder().doh_controld(),
        Client::builder().doh_njalla(),
        Client::builder().doh_shecan(),
        Client::builder().doh_libredns(),
    ];
    assert!(builders.iter().all(|b| b.is_ok()));
}

#[test]
fn test_unknown_pref_rejected() {
    assert_eq!(
        Client::builder().doh_pref(14).unwrap_err(),
        NetError::UnknownDohProvider(14)
    );
}

#[tokio::test]
async fn test_installed_resolver_drives_targets() {
    let client = Client::builder()
        .dns_resolver(Arc::new(FixedResolver(vec![IpAddr::V4(Ipv4Addr::new(
            198, 51, 100, 4,
        ))])))
        .build();

    let targets = client.resolve_target("api.example.com", 443).await.unwrap();
    assert_eq!(targets, vec!["198.51.100.4:443".parse::<SocketAddr>().unwrap()]);
}

#[tokio::test]
async fn test_empty_answer_is_no_route() {
    let client = Client::builder()
        .dns_resolver(Arc::new(FixedResolver(vec![])))
        .build();

    let targets = client.resolve_target("nothing.example", 80).await.unwrap();
    assert!(targets.is_empty());
}

#[test]
fn test_settings_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "provider": "mullvad", "timeout_ms": 4000 }}"#).unwrap();

    let settings = DohSettings::from_file(file.path()).unwrap();
    let builder = settings.apply(Client::builder()).unwrap();
    assert_eq!(builder.config().timeout, Duration::from_secs(4));
    assert!(builder.config().dns_resolver.is_some());
}

#[test]
fn test_settings_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DohSettings::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, NetError::InvalidSettings { .. }));
}

#[test]
fn test_settings_json_round_trip() {
    let settings = DohSettings {
        cache_size: Some(32),
        ..DohSettings::new(DohProvider::LibreDns)
    };
    let text = settings.to_json().unwrap();
    assert_eq!(DohSettings::from_json(&text).unwrap(), settings);
}

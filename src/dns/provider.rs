//! Public DNS-over-HTTPS providers.
//!
//! A fixed table mapping each [`DohProvider`] to its query URL and the
//! bootstrap addresses used to reach the DoH server before any DNS works.
//! The table is built at compile time and never mutated. URLs and bootstrap
//! literals must match each provider's public service exactly: users behind
//! networks that block plain DNS depend on them.
//!
//! Bootstrap lists carry IPv4 only; IPv6 bootstrap addresses are left out
//! on purpose since resolvers built here are IPv4-only.

use crate::base::neterror::NetError;
use std::borrow::Cow;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use url::Url;

const fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// A public DoH provider, identified by its stable preference number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DohProvider {
    Cloudflare = 1,
    Google = 2,
    AdGuard = 3,
    Quad9 = 4,
    AliDns = 5,
    DnsPod = 6,
    Dns360 = 7,
    Quad101 = 8,
    Mullvad = 9,
    ControlD = 10,
    Njalla = 11,
    Shecan = 12,
    LibreDns = 13,
}

impl DohProvider {
    /// Every provider, in preference-number order.
    pub const ALL: [DohProvider; 13] = [
        DohProvider::Cloudflare,
        DohProvider::Google,
        DohProvider::AdGuard,
        DohProvider::Quad9,
        DohProvider::AliDns,
        DohProvider::DnsPod,
        DohProvider::Dns360,
        DohProvider::Quad101,
        DohProvider::Mullvad,
        DohProvider::ControlD,
        DohProvider::Njalla,
        DohProvider::Shecan,
        DohProvider::LibreDns,
    ];

    /// The stable preference number stored in user settings.
    pub fn pref(self) -> i32 {
        self as i32
    }

    /// Lowercase tag accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            DohProvider::Cloudflare => "cloudflare",
            DohProvider::Google => "google",
            DohProvider::AdGuard => "adguard",
            DohProvider::Quad9 => "quad9",
            DohProvider::AliDns => "alidns",
            DohProvider::DnsPod => "dnspod",
            DohProvider::Dns360 => "360",
            DohProvider::Quad101 => "quad101",
            DohProvider::Mullvad => "mullvad",
            DohProvider::ControlD => "controld",
            DohProvider::Njalla => "njalla",
            DohProvider::Shecan => "shecan",
            DohProvider::LibreDns => "libredns",
        }
    }

    /// The provider's endpoint from the static table.
    pub fn endpoint(self) -> &'static ProviderEndpoint {
        &PROVIDERS[self as usize - 1]
    }
}

impl TryFrom<i32> for DohProvider {
    type Error = NetError;

    fn try_from(pref: i32) -> Result<Self, Self::Error> {
        DohProvider::ALL
            .into_iter()
            .find(|p| p.pref() == pref)
            .ok_or(NetError::UnknownDohProvider(pref))
    }
}

impl FromStr for DohProvider {
    type Err = NetError;

    /// Parses a tag (case-insensitive) or a preference number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(provider) = DohProvider::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
        {
            return Ok(provider);
        }
        match s.parse::<i32>() {
            Ok(pref) => DohProvider::try_from(pref),
            Err(_) => Err(NetError::invalid_settings(format!(
                "unknown DoH provider `{s}`"
            ))),
        }
    }
}

impl fmt::Display for DohProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A DoH query URL plus the ordered bootstrap addresses for its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    url: Cow<'static, str>,
    bootstrap: Cow<'static, [IpAddr]>,
}

impl ProviderEndpoint {
    const fn fixed(url: &'static str, bootstrap: &'static [IpAddr]) -> Self {
        Self {
            url: Cow::Borrowed(url),
            bootstrap: Cow::Borrowed(bootstrap),
        }
    }

    /// Creates an endpoint outside the fixed table.
    ///
    /// The URL must parse, use `https`, and carry a host. The bootstrap list
    /// may be empty and may mix address families; filtering happens when a
    /// resolver is built.
    pub fn custom(url: impl Into<String>, bootstrap: Vec<IpAddr>) -> Result<Self, NetError> {
        let url = url.into();
        let parsed = Url::parse(url.trim())?;
        if parsed.scheme() != "https" {
            return Err(NetError::DisallowedUrlScheme);
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(NetError::InvalidUrl);
        }
        Ok(Self {
            url: Cow::Owned(parsed.to_string()),
            bootstrap: Cow::Owned(bootstrap),
        })
    }

    /// The DoH query URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bootstrap addresses in table order.
    pub fn bootstrap(&self) -> &[IpAddr] {
        &self.bootstrap
    }
}

/// Looks up a provider's endpoint by preference number.
pub fn lookup(pref: i32) -> Result<&'static ProviderEndpoint, NetError> {
    DohProvider::try_from(pref).map(DohProvider::endpoint)
}

static CLOUDFLARE: [IpAddr; 5] = [
    v4(162, 159, 36, 1),
    v4(162, 159, 46, 1),
    v4(1, 1, 1, 1),
    v4(1, 0, 0, 1),
    v4(162, 159, 132, 53),
];
static GOOGLE: [IpAddr; 2] = [v4(8, 8, 4, 4), v4(8, 8, 8, 8)];
static ADGUARD: [IpAddr; 2] = [v4(94, 140, 14, 140), v4(94, 140, 14, 141)];
static QUAD9: [IpAddr; 2] = [v4(9, 9, 9, 9), v4(149, 112, 112, 112)];
static ALIDNS: [IpAddr; 2] = [v4(223, 5, 5, 5), v4(223, 6, 6, 6)];
static DNSPOD: [IpAddr; 2] = [v4(1, 12, 12, 12), v4(120, 53, 53, 53)];
static DNS360: [IpAddr; 7] = [
    v4(101, 226, 4, 6),
    v4(218, 30, 118, 6),
    v4(123, 125, 81, 6),
    v4(140, 207, 198, 6),
    v4(180, 163, 249, 75),
    v4(101, 199, 113, 208),
    v4(36, 99, 170, 86),
];
static QUAD101: [IpAddr; 1] = [v4(101, 101, 101, 101)];
static MULLVAD: [IpAddr; 1] = [v4(194, 242, 2, 2)];
static CONTROLD: [IpAddr; 2] = [v4(76, 76, 2, 0), v4(76, 76, 10, 0)];
static NJALLA: [IpAddr; 1] = [v4(95, 215, 19, 53)];
static SHECAN: [IpAddr; 2] = [v4(178, 22, 122, 100), v4(185, 51, 200, 2)];
static LIBREDNS: [IpAddr; 1] = [v4(116, 202, 176, 26)];

/// Indexed by `pref - 1`.
static PROVIDERS: [ProviderEndpoint; 13] = [
    ProviderEndpoint::fixed("https://cloudflare-dns.com/dns-query", &CLOUDFLARE),
    ProviderEndpoint::fixed("https://dns.google/dns-query", &GOOGLE),
    ProviderEndpoint::fixed("https://dns-unfiltered.adguard.com/dns-query", &ADGUARD),
    ProviderEndpoint::fixed("https://dns.quad9.net/dns-query", &QUAD9),
    ProviderEndpoint::fixed("https://dns.alidns.com/dns-query", &ALIDNS),
    ProviderEndpoint::fixed("https://doh.pub/dns-query", &DNSPOD),
    ProviderEndpoint::fixed("https://doh.360.cn/dns-query", &DNS360),
    ProviderEndpoint::fixed("https://dns.twnic.tw/dns-query", &QUAD101),
    ProviderEndpoint::fixed("https://dns.mullvad.net/dns-query", &MULLVAD),
    ProviderEndpoint::fixed("https://freedns.controld.com/p0", &CONTROLD),
    ProviderEndpoint::fixed("https://dns.njal.la/dns-query", &NJALLA),
    ProviderEndpoint::fixed("https://free.shecan.ir/dns-query", &SHECAN),
    ProviderEndpoint::fixed("https://doh.libredns.gr/dns-query", &LIBREDNS),
];

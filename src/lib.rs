//! # dohnet
//!
//! DNS-over-HTTPS resolution for HTTP clients.
//!
//! `dohnet` builds DoH resolvers for a fixed set of public providers and
//! installs them as the DNS strategy of a client. Resolvers are seeded with
//! each provider's bootstrap addresses and answer with IPv4 addresses only,
//! for networks where IPv6 is broken or blocked.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dohnet::client::Client;
//! use dohnet::dns::DohProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dohnet::base::neterror::NetError> {
//!     let client = Client::builder().doh(DohProvider::Cloudflare)?.build();
//!     let targets = client.resolve_target("example.com", 443).await?;
//!     println!("Targets: {:?}", targets);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`dns`] - Provider registry, DoH resolver builder, IPv4 filtering
//! - [`client`] - Client configuration and DNS strategy slot
//! - [`config`] - Persisted DoH settings
//!
//! ## Providers
//!
//! Cloudflare, Google, AdGuard, Quad9, AliDNS, DNSPod, 360, Quad101,
//! Mullvad, ControlD, Njalla, Shecan and LibreDNS, selected by preference
//! number 1 to 13.

pub mod base;
pub mod client;
pub mod config;
pub mod dns;

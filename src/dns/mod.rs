//! DNS Resolution Module
//!
//! Provides pluggable DNS resolution with:
//! - A fixed registry of public DNS-over-HTTPS providers
//! - DoH resolvers (hickory-dns) seeded with IPv4 bootstrap addresses
//! - An IPv4-only decorator applied to every DoH answer
//! - System resolver (getaddrinfo via thread pool)
//! - Hostname-to-IP override mechanism
//!
//! # Architecture
//!
//! The `Resolve` trait is the core abstraction; every resolver here,
//! including the filtering and override decorators, implements it and can
//! be installed as a client's DNS strategy.
//!
//! # Example
//!
//! ```rust,ignore
//! use dohnet::client::ClientConfig;
//! use dohnet::dns::{build_doh_resolver, provider, Name, Resolve};
//!
//! let endpoint = provider::lookup(1)?; // Cloudflare
//! let resolver = build_doh_resolver(endpoint, &ClientConfig::default())?;
//! for addr in resolver.resolve(Name::new("example.com")).await? {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod doh;
mod gai;
mod ipv4;
pub mod provider;
mod resolve;

pub use doh::{build_doh_resolver, DohResolver, DohResolverBuilder, MAX_DNS_ATTEMPTS};
pub use gai::GaiResolver;
pub use ipv4::{ipv4_only, Ipv4OnlyResolver};
pub use provider::{DohProvider, ProviderEndpoint};
pub use resolve::{Addrs, DnsResolverWithOverrides, Name, Resolve, Resolving};

//! Resolve a hostname through one of the built-in DoH providers.
//!
//! Usage: `cargo run --example doh_lookup -- <provider> <hostname>`
//! where `<provider>` is a preference number (1-13) or a tag like `quad9`.

use dohnet::client::Client;
use dohnet::dns::DohProvider;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let provider: DohProvider = args.next().as_deref().unwrap_or("cloudflare").parse()?;
    let host = args.next().unwrap_or_else(|| "example.com".to_string());

    let client = Client::builder().doh(provider)?.build();
    println!("{} -> {}", provider, provider.endpoint().url());

    let start = Instant::now();
    let targets = client.resolve_target(&host, 443).await?;
    println!("First lookup: {:?} in {:?}", targets, start.elapsed());

    let start = Instant::now();
    let _ = client.resolve_target(&host, 443).await?;
    println!("Second lookup (cached): {:?}", start.elapsed());

    if targets.is_empty() {
        println!("{host} has no IPv4 address");
    }
    Ok(())
}

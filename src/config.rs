//! Persisted DoH settings.
//!
//! The provider is stored the way user preferences store it, as a
//! preference number, though a tag such as `"quad9"` is accepted too.
//!
//! ```json
//! { "provider": 1, "timeout_ms": 5000, "attempts": 2, "cache_size": 128 }
//! ```

use crate::base::neterror::NetError;
use crate::client::ClientBuilder;
use crate::dns::DohProvider;
use serde::{Deserialize, Serialize};
#[cfg(feature = "json")]
use std::path::Path;
use std::time::Duration;

/// A provider chosen by preference number or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderSelection {
    Pref(i32),
    Tag(String),
}

impl ProviderSelection {
    /// Resolves the selection against the provider table.
    pub fn provider(&self) -> Result<DohProvider, NetError> {
        match self {
            ProviderSelection::Pref(pref) => DohProvider::try_from(*pref),
            ProviderSelection::Tag(tag) => tag.parse(),
        }
    }
}

impl From<DohProvider> for ProviderSelection {
    fn from(provider: DohProvider) -> Self {
        ProviderSelection::Pref(provider.pref())
    }
}

/// DoH provider choice plus optional resolver tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DohSettings {
    pub provider: ProviderSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<usize>,
}

impl DohSettings {
    /// Settings selecting `provider` with default tuning.
    pub fn new(provider: DohProvider) -> Self {
        Self {
            provider: provider.into(),
            timeout_ms: None,
            attempts: None,
            cache_size: None,
        }
    }

    /// Parse and validate settings from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json(text: &str) -> Result<Self, NetError> {
        let settings: DohSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file.
    #[cfg(feature = "json")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            NetError::invalid_settings(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded DoH settings");
        Self::from_json(&text)
    }

    /// Serialize to JSON text.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, NetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the provider exists and the tuning values are usable.
    pub fn validate(&self) -> Result<(), NetError> {
        self.provider.provider()?;
        if self.timeout_ms == Some(0) {
            return Err(NetError::invalid_settings("timeout_ms must be positive"));
        }
        if self.attempts == Some(0) {
            return Err(NetError::invalid_settings("attempts must be positive"));
        }
        Ok(())
    }

    /// Applies the tuning to `builder`, then installs the selected provider.
    pub fn apply(&self, builder: ClientBuilder) -> Result<ClientBuilder, NetError> {
        self.validate()?;
        let mut builder = builder;
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        if let Some(attempts) = self.attempts {
            builder = builder.dns_attempts(attempts);
        }
        if let Some(size) = self.cache_size {
            builder = builder.dns_cache_size(size);
        }
        builder.doh(self.provider.provider()?)
    }
}

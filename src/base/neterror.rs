use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Resolution Errors
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name resolution failed for {domain}: {message}")]
    NameResolutionFailedFor { domain: String, message: String },

    // URL Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,

    // DNS Errors
    #[error("DNS malformed response")]
    DnsMalformedResponse,
    #[error("DNS server failed")]
    DnsServerFailed,
    #[error("DNS timed out")]
    DnsTimedOut,
    #[error("DNS secure resolver hostname resolution failed for {host}")]
    DnsSecureResolverHostnameResolutionFailed { host: String },

    // Configuration errors (custom codes starting at -900)
    #[error("Unknown DoH provider: {0}")]
    UnknownDohProvider(i32),
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("Unknown error ({0})")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::NameNotResolved => -105,
            NetError::NameResolutionFailedFor { .. } => -137,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,

            NetError::DnsMalformedResponse => -800,
            NetError::DnsServerFailed => -802,
            NetError::DnsTimedOut => -803,
            NetError::DnsSecureResolverHostnameResolutionFailed { .. } => -808,

            NetError::UnknownDohProvider(_) => -905,
            NetError::InvalidSettings { .. } => -906,
            NetError::Unknown(code) => *code,
        }
    }

    /// Returns true for failures reaching or querying a DNS server.
    ///
    /// An empty answer is not an error and never maps to one of these.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved
                | NetError::NameResolutionFailedFor { .. }
                | NetError::DnsMalformedResponse
                | NetError::DnsServerFailed
                | NetError::DnsTimedOut
                | NetError::DnsSecureResolverHostnameResolutionFailed { .. }
        )
    }

    pub fn name_resolution_failed(domain: impl Into<String>, message: impl Into<String>) -> Self {
        NetError::NameResolutionFailedFor {
            domain: domain.into(),
            message: message.into(),
        }
    }

    pub fn invalid_settings(message: impl Into<String>) -> Self {
        NetError::InvalidSettings {
            message: message.into(),
        }
    }
}

/// Decodes an error code.
///
/// Variants that carry details decode with empty details: only the code
/// survives a trip through `as_i32`.
impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -105 => NetError::NameNotResolved,
            -137 => NetError::name_resolution_failed("", ""),
            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -800 => NetError::DnsMalformedResponse,
            -802 => NetError::DnsServerFailed,
            -803 => NetError::DnsTimedOut,
            -808 => NetError::DnsSecureResolverHostnameResolutionFailed {
                host: String::new(),
            },
            -905 => NetError::UnknownDohProvider(0),
            -906 => NetError::invalid_settings(""),
            _ => NetError::Unknown(code),
        }
    }
}

impl From<url::ParseError> for NetError {
    fn from(_: url::ParseError) -> Self {
        NetError::InvalidUrl
    }
}

impl From<serde_json::Error> for NetError {
    fn from(err: serde_json::Error) -> Self {
        NetError::invalid_settings(err.to_string())
    }
}

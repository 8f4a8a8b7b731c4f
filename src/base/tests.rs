use crate::base::neterror::NetError;

#[test]
fn test_net_error_roundtrip() {
    // Standard Chromium error
    let original = NetError::NameNotResolved;
    let code = original.as_i32();
    assert_eq!(code, -105);
    let converted = NetError::from(code);
    assert!(matches!(converted, NetError::NameNotResolved));

    let dns = NetError::DnsTimedOut;
    assert_eq!(dns.as_i32(), -803);
    assert_eq!(NetError::from(-803), NetError::DnsTimedOut);
}

#[test]
fn test_every_code_survives_roundtrip() {
    let errors = [
        NetError::NameNotResolved,
        NetError::name_resolution_failed("a.example", "refused"),
        NetError::InvalidUrl,
        NetError::DisallowedUrlScheme,
        NetError::DnsMalformedResponse,
        NetError::DnsServerFailed,
        NetError::DnsTimedOut,
        NetError::DnsSecureResolverHostnameResolutionFailed {
            host: "dns.google".into(),
        },
        NetError::UnknownDohProvider(42),
        NetError::invalid_settings("bad"),
    ];

    for err in errors {
        let decoded = NetError::from(err.as_i32());
        assert_eq!(decoded.as_i32(), err.as_i32(), "{err:?}");
        assert!(!matches!(decoded, NetError::Unknown(_)), "{err:?}");
    }
}

#[test]
fn test_detailed_codes_decode_without_details() {
    assert_eq!(
        NetError::from(-808),
        NetError::DnsSecureResolverHostnameResolutionFailed {
            host: String::new()
        }
    );
    assert_eq!(NetError::from(-905), NetError::UnknownDohProvider(0));
    assert!(matches!(NetError::from(-906), NetError::InvalidSettings { .. }));
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
}

#[test]
fn test_unknown_provider_code() {
    let err = NetError::UnknownDohProvider(42);
    assert_eq!(err.as_i32(), -905);
    assert_eq!(err.to_string(), "Unknown DoH provider: 42");
    assert!(!err.is_resolution_error());
}

#[test]
fn test_resolution_error_classification() {
    assert!(NetError::DnsTimedOut.is_resolution_error());
    assert!(NetError::name_resolution_failed("a.example", "refused").is_resolution_error());
    assert!(NetError::DnsSecureResolverHostnameResolutionFailed {
        host: "dns.google".into()
    }
    .is_resolution_error());
    assert!(!NetError::InvalidUrl.is_resolution_error());
    assert!(!NetError::invalid_settings("bad").is_resolution_error());
}

#[test]
fn test_url_parse_error_conversion() {
    let err: NetError = url::Url::parse("not a url").unwrap_err().into();
    assert_eq!(err, NetError::InvalidUrl);
}

//! Security header stage
//!
//! Attaches a fixed set of protective response headers to every response,
//! hit or miss. The stage only decorates; it never affects routing and
//! never rejects a request.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

/// The protective set, matching the defaults of the usual HTTP hardening
/// middlewares.
const PROTECTIVE_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

#[derive(Debug, Default)]
pub struct SecurityHeaders;

impl SecurityHeaders {
    pub const fn new() -> Self {
        Self
    }

    /// Insert the protective set into the pending response headers.
    pub fn apply(&self, pending: &mut HeaderMap) {
        for &(name, value) in PROTECTIVE_HEADERS {
            // Names and values are static and known-valid
            pending.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_full_protective_set() {
        let mut headers = HeaderMap::new();
        SecurityHeaders::new().apply(&mut headers);

        assert_eq!(headers.len(), PROTECTIVE_HEADERS.len());
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
        assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
        assert_eq!(headers["referrer-policy"], "no-referrer");
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut headers = HeaderMap::new();
        let stage = SecurityHeaders::new();
        stage.apply(&mut headers);
        stage.apply(&mut headers);
        assert_eq!(headers.len(), PROTECTIVE_HEADERS.len());
    }
}

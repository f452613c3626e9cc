//! Client network metadata extracted from inbound request headers.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

/// Inbound header carrying the client IP as seen by Cloudflare.
pub const CF_CONNECTING_IP: HeaderName = HeaderName::from_static("cf-connecting-ip");
/// Outbound header with the resolved client IP.
///
/// Intermediate proxies in front of the backend rewrite `x-forwarded-for` and
/// `x-real-ip`, but leave this one alone.
pub const X_CLIENT_REAL_IP: HeaderName = HeaderName::from_static("x-client-real-ip");
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
/// Alternate spelling of `referer` sent by some clients.
pub const REFERRER: HeaderName = HeaderName::from_static("referrer");

/// Client metadata relevant to click tracking.
///
/// Populated once at the HTTP boundary via [`ClientMetadata::from_headers`].
/// Empty header values are treated as absent. Repeated header lines are
/// joined with `", "`.
///
/// `user_agent` and `referer` keep the raw header bytes so they are forwarded
/// even when not valid UTF-8. The IP headers must be UTF-8 to be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMetadata {
    pub user_agent: Option<HeaderValue>,
    pub referer: Option<HeaderValue>,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub cf_connecting_ip: Option<String>,
}

impl ClientMetadata {
    /// Extracts metadata from inbound request headers.
    ///
    /// `referer` falls back to `referrer` when the former is missing.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_agent: header_value(headers, &header::USER_AGENT),
            referer: header_value(headers, &header::REFERER)
                .or_else(|| header_value(headers, &REFERRER)),
            forwarded_for: header_str(headers, &X_FORWARDED_FOR),
            real_ip: header_str(headers, &X_REAL_IP),
            cf_connecting_ip: header_str(headers, &CF_CONNECTING_IP),
        }
    }

    /// Resolves the effective client IP.
    ///
    /// Order: first entry of `x-forwarded-for`, then `x-real-ip`, then
    /// `cf-connecting-ip`. The value is not parsed as an IP address.
    pub fn client_ip(&self) -> Option<&str> {
        self.forwarded_for
            .as_deref()
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or(self.real_ip.as_deref())
            .or(self.cf_connecting_ip.as_deref())
    }

    /// Builds the header set sent to the backend lookup endpoint.
    ///
    /// Values that cannot be represented as a header value are skipped.
    pub fn outbound_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if let Some(user_agent) = &self.user_agent {
            headers.insert(header::USER_AGENT, user_agent.clone());
        }
        if let Some(referer) = &self.referer {
            headers.insert(header::REFERER, referer.clone());
        }

        if let Some(ip) = self.client_ip() {
            let chain = match self.forwarded_for.as_deref() {
                Some(existing) => format!("{ip}, {existing}"),
                None => ip.to_string(),
            };

            insert_opt(&mut headers, X_CLIENT_REAL_IP, Some(ip));
            insert_opt(&mut headers, X_FORWARDED_FOR, Some(&chain));
            insert_opt(&mut headers, X_REAL_IP, Some(ip));
        }

        headers
    }
}

/// All non-empty values of `name`, joined with `", "` in arrival order.
fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<HeaderValue> {
    let mut values = headers.get_all(name).iter().filter(|v| !v.is_empty());
    let first = values.next()?;

    let mut joined = first.as_bytes().to_vec();
    let mut repeated = false;
    for value in values {
        joined.extend_from_slice(b", ");
        joined.extend_from_slice(value.as_bytes());
        repeated = true;
    }

    if repeated {
        HeaderValue::from_bytes(&joined).ok()
    } else {
        Some(first.clone())
    }
}

fn header_str(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    header_value(headers, name).and_then(|v| v.to_str().ok().map(str::to_owned))
}

fn insert_opt(headers: &mut HeaderMap, name: HeaderName, value: Option<&str>) {
    if let Some(value) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_entry() {
        let meta = ClientMetadata::from_headers(&headers(&[
            ("x-forwarded-for", " 1.2.3.4 , 5.6.7.8"),
            ("x-real-ip", "10.0.0.1"),
            ("cf-connecting-ip", "9.9.9.9"),
        ]));

        assert_eq!(meta.client_ip(), Some("1.2.3.4"));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let meta = ClientMetadata::from_headers(&headers(&[
            ("x-real-ip", "10.0.0.1"),
            ("cf-connecting-ip", "9.9.9.9"),
        ]));

        assert_eq!(meta.client_ip(), Some("10.0.0.1"));
    }

    #[test]
    fn test_client_ip_from_cf_header_only() {
        let meta = ClientMetadata::from_headers(&headers(&[("cf-connecting-ip", "9.9.9.9")]));

        assert_eq!(meta.client_ip(), Some("9.9.9.9"));
    }

    #[test]
    fn test_client_ip_skips_blank_forwarded_entry() {
        let meta = ClientMetadata::from_headers(&headers(&[
            ("x-forwarded-for", " , 5.6.7.8"),
            ("x-real-ip", "10.0.0.1"),
        ]));

        assert_eq!(meta.client_ip(), Some("10.0.0.1"));
    }

    #[test]
    fn test_client_ip_absent() {
        let meta = ClientMetadata::from_headers(&HeaderMap::new());

        assert_eq!(meta.client_ip(), None);
    }

    #[test]
    fn test_empty_header_values_are_absent() {
        let meta = ClientMetadata::from_headers(&headers(&[
            ("user-agent", ""),
            ("x-real-ip", ""),
        ]));

        assert_eq!(meta, ClientMetadata::default());
    }

    #[test]
    fn test_referrer_fallback() {
        let meta = ClientMetadata::from_headers(&headers(&[("referrer", "https://a.example")]));
        assert_eq!(meta.referer.unwrap(), "https://a.example");

        let meta = ClientMetadata::from_headers(&headers(&[
            ("referer", "https://b.example"),
            ("referrer", "https://a.example"),
        ]));
        assert_eq!(meta.referer.unwrap(), "https://b.example");
    }

    #[test]
    fn test_repeated_forwarded_for_lines_are_joined() {
        let mut map = HeaderMap::new();
        map.append(X_FORWARDED_FOR, HeaderValue::from_static("1.2.3.4"));
        map.append(X_FORWARDED_FOR, HeaderValue::from_static("5.6.7.8"));

        let meta = ClientMetadata::from_headers(&map);
        let out = meta.outbound_headers();

        assert_eq!(meta.forwarded_for.as_deref(), Some("1.2.3.4, 5.6.7.8"));
        assert_eq!(meta.client_ip(), Some("1.2.3.4"));
        assert_eq!(out["x-forwarded-for"], "1.2.3.4, 1.2.3.4, 5.6.7.8");
    }

    #[test]
    fn test_non_utf8_user_agent_forwarded_verbatim() {
        let raw = HeaderValue::from_bytes(b"Agent/\xE9").unwrap();
        let mut map = HeaderMap::new();
        map.insert(header::USER_AGENT, raw.clone());
        map.insert(
            header::REFERER,
            HeaderValue::from_bytes(b"https://a.example/\xFC").unwrap(),
        );

        let out = ClientMetadata::from_headers(&map).outbound_headers();

        assert_eq!(out[header::USER_AGENT].as_bytes(), b"Agent/\xE9");
        assert_eq!(out[header::REFERER].as_bytes(), b"https://a.example/\xFC");
        assert_eq!(out[header::USER_AGENT], raw);
    }

    #[test]
    fn test_outbound_headers_prepend_client_ip_to_chain() {
        let meta = ClientMetadata::from_headers(&headers(&[(
            "x-forwarded-for",
            "1.2.3.4, 5.6.7.8",
        )]));

        let out = meta.outbound_headers();

        assert_eq!(out["x-client-real-ip"], "1.2.3.4");
        assert_eq!(out["x-forwarded-for"], "1.2.3.4, 1.2.3.4, 5.6.7.8");
        assert_eq!(out["x-real-ip"], "1.2.3.4");
        assert_eq!(out[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_outbound_headers_without_chain() {
        let meta = ClientMetadata::from_headers(&headers(&[("cf-connecting-ip", "9.9.9.9")]));

        let out = meta.outbound_headers();

        assert_eq!(out["x-client-real-ip"], "9.9.9.9");
        assert_eq!(out["x-forwarded-for"], "9.9.9.9");
        assert_eq!(out["x-real-ip"], "9.9.9.9");
    }

    #[test]
    fn test_outbound_headers_without_ip() {
        let meta = ClientMetadata::from_headers(&headers(&[("user-agent", "TestBot/1.0")]));

        let out = meta.outbound_headers();

        assert!(out.get("x-client-real-ip").is_none());
        assert!(out.get("x-forwarded-for").is_none());
        assert!(out.get("x-real-ip").is_none());
        assert_eq!(out[header::USER_AGENT], "TestBot/1.0");
        assert!(out.get(header::REFERER).is_none());
        assert_eq!(out.len(), 2);
    }
}

//! `urlDetails`: the page location broken into its parts.

use crate::host::{EnvironmentProvider, HostError};
use crate::readers::non_empty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRaw {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlOrigin {
    pub protocol: String,
    pub origin: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub is_secure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlPath {
    pub pathname: String,
    pub segments: Vec<String>,
    pub depth: usize,
    pub has_trailing_slash: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlQuery {
    pub raw: String,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlAuth {
    pub password_present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlNavigation {
    pub referrer: Option<String>,
}

/// Location of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlDetails {
    pub raw: UrlRaw,
    pub origin: UrlOrigin,
    pub path: UrlPath,
    pub query: UrlQuery,
    pub hash: String,
    pub auth: UrlAuth,
    pub navigation: UrlNavigation,
}

pub fn url_details(host: &dyn EnvironmentProvider) -> Result<UrlDetails, HostError> {
    let location = host.location()?;
    let referrer = host.document()?.referrer;

    let segments = path_segments(&location.pathname);

    Ok(UrlDetails {
        raw: UrlRaw {
            href: location.href,
        },
        origin: UrlOrigin {
            is_secure: location.protocol == "https:",
            protocol: location.protocol,
            origin: location.origin,
            host: location.host,
            hostname: location.hostname,
            port: location.port,
        },
        path: UrlPath {
            depth: segments.len(),
            segments,
            has_trailing_slash: location.pathname.ends_with('/'),
            pathname: location.pathname,
        },
        query: UrlQuery {
            params: parse_query(&location.search),
            raw: location.search,
        },
        hash: location.hash,
        auth: UrlAuth {
            password_present: !location.password.is_empty(),
        },
        navigation: UrlNavigation {
            referrer: non_empty(referrer),
        },
    })
}

/// Non-empty `/`-separated pieces of a path.
fn path_segments(pathname: &str) -> Vec<String> {
    pathname
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode a query string with `application/x-www-form-urlencoded` rules.
///
/// When a name repeats, the last value wins.
fn parse_query(search: &str) -> BTreeMap<String, String> {
    let query = search.strip_prefix('?').unwrap_or(search);

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (form_decode(name), form_decode(value)),
            None => (form_decode(pair), String::new()),
        })
        .collect()
}

fn form_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostApi, LocationInfo, StaticHost};

    fn host_at(location: LocationInfo) -> StaticHost {
        let host = StaticHost::default();
        host.update(|h| h.location = location);
        host
    }

    fn shop_location() -> LocationInfo {
        LocationInfo {
            href: "https://shop.example.com:8443/catalog/shoes/?q=red+boots&page=2#reviews"
                .to_string(),
            protocol: "https:".to_string(),
            origin: "https://shop.example.com:8443".to_string(),
            host: "shop.example.com:8443".to_string(),
            hostname: "shop.example.com".to_string(),
            port: "8443".to_string(),
            pathname: "/catalog/shoes/".to_string(),
            search: "?q=red+boots&page=2".to_string(),
            hash: "#reviews".to_string(),
            password: String::new(),
        }
    }

    #[test]
    fn test_path_breakdown() {
        let details = url_details(&host_at(shop_location())).unwrap();

        assert_eq!(details.path.segments, vec!["catalog", "shoes"]);
        assert_eq!(details.path.depth, 2);
        assert!(details.path.has_trailing_slash);
        assert!(details.origin.is_secure);
        assert_eq!(details.origin.port, "8443");
        assert_eq!(details.hash, "#reviews");
    }

    #[test]
    fn test_query_params() {
        let details = url_details(&host_at(shop_location())).unwrap();

        assert_eq!(details.query.raw, "?q=red+boots&page=2");
        assert_eq!(details.query.params["q"], "red boots");
        assert_eq!(details.query.params["page"], "2");
    }

    #[test]
    fn test_query_decoding_rules() {
        let params = parse_query("?a=1&a=2&name=J%C3%BCrgen&flag&bad=%zz&&eq=x=y");

        assert_eq!(params["a"], "2");
        assert_eq!(params["name"], "Jürgen");
        assert_eq!(params["flag"], "");
        assert_eq!(params["bad"], "%zz");
        assert_eq!(params["eq"], "x=y");
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_truncated_escape_is_literal() {
        assert_eq!(form_decode("100%"), "100%");
        assert_eq!(form_decode("%4"), "%4");
        assert_eq!(form_decode("%41"), "A");
    }

    #[test]
    fn test_root_path_and_insecure_origin() {
        let host = host_at(LocationInfo {
            href: "http://localhost/".to_string(),
            protocol: "http:".to_string(),
            origin: "http://localhost".to_string(),
            host: "localhost".to_string(),
            hostname: "localhost".to_string(),
            pathname: "/".to_string(),
            password: "hunter2".to_string(),
            ..LocationInfo::default()
        });
        let details = url_details(&host).unwrap();

        assert!(details.path.segments.is_empty());
        assert_eq!(details.path.depth, 0);
        assert!(details.path.has_trailing_slash);
        assert!(!details.origin.is_secure);
        assert!(details.auth.password_present);
        assert!(details.query.params.is_empty());
    }

    #[test]
    fn test_empty_referrer_is_null() {
        let host = StaticHost::default();
        host.update(|h| h.document.referrer = Some(String::new()));
        assert!(url_details(&host).unwrap().navigation.referrer.is_none());

        host.update(|h| h.document.referrer = Some("https://search.example/".to_string()));
        assert_eq!(
            url_details(&host).unwrap().navigation.referrer.as_deref(),
            Some("https://search.example/")
        );
    }

    #[test]
    fn test_location_failure_propagates() {
        let host = StaticHost::default();
        host.fail(HostApi::Location);
        assert!(url_details(&host).is_err());
    }
}

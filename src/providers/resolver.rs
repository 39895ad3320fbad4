//! SSRF-Safe URL Resolver
//!
//! Walks a redirect chain hop by hop with redirects disabled at the HTTP
//! client level. Before every connection - initial request and each
//! redirect target - the hostname is re-resolved and rejected if any
//! resolved address falls in loopback, link-local, private, multicast,
//! unspecified or cloud-metadata space. The connection is then pinned to
//! the address that passed the check, so a DNS answer cannot change
//! between check and connect.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::lookup_host;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use super::UrlResolve;
use crate::utils::constants::USER_AGENT;

/// Failure taxonomy surfaced in `UrlMetadata.errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorType {
    Timeout,
    Dns,
    Blocked,
    Unknown,
}

impl ResolveErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Dns => "dns",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of walking a URL's redirect chain.
#[derive(Debug, Clone)]
pub struct UrlResolution {
    /// Last URL in the chain (the landing page on success)
    pub final_url: String,
    pub redirect_count: u32,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub error_type: Option<ResolveErrorType>,
}

impl UrlResolution {
    fn failed(url: &Url, redirects: u32, error: ResolveErrorType) -> Self {
        Self {
            final_url: url.to_string(),
            redirect_count: redirects,
            reachable: false,
            status_code: None,
            error_type: Some(error),
        }
    }
}

// ============================================
// Address-space policy
// ============================================

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()  // includes 169.254.169.254 cloud metadata
        || ip.is_multicast()
        || ip.is_broadcast()
        || octets[0] == 0
        // 100.64.0.0/10 shared address space (CGNAT)
        || (octets[0] == 100 && (64..=127).contains(&octets[1]))
        // 192.0.0.0/24 IETF protocol assignments
        || (octets[0] == 192 && octets[1] == 0 && octets[2] == 0)
}

/// Reject any address a scan must never connect to. IPv4-mapped IPv6
/// addresses are unwrapped and checked as IPv4 so `::ffff:127.0.0.1`
/// cannot slip through.
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_blocked_v4(v4),
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_blocked_v4(mapped);
            }
            let segments = v6.segments();
            v6.is_unspecified()
                || v6.is_loopback()
                || v6.is_multicast()
                // fc00::/7 unique local (RFC4193, includes fd00:ec2::254 metadata)
                || (segments[0] & 0xfe00) == 0xfc00
                // fe80::/10 link-local
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

// ============================================
// Resolver
// ============================================

/// Bounded-hop redirect walker with per-hop address-space checks.
pub struct SsrfSafeResolver {
    max_redirects: u32,
    timeout: Duration,
}

impl SsrfSafeResolver {
    pub fn new(max_redirects: u32, timeout: Duration) -> Self {
        Self {
            max_redirects,
            timeout,
        }
    }

    /// Resolve the host of `url` and return the vetted address, or the
    /// failure class. Runs immediately before each connection attempt.
    async fn vet_host(&self, url: &Url) -> Result<Option<(String, IpAddr)>, ResolveErrorType> {
        let Some(host) = url.host() else {
            return Err(ResolveErrorType::Unknown);
        };
        let port = url.port_or_known_default().unwrap_or(443);

        match host {
            url::Host::Ipv4(ip) => {
                if is_blocked_v4(ip) {
                    return Err(ResolveErrorType::Blocked);
                }
                Ok(None)
            }
            url::Host::Ipv6(ip) => {
                if is_blocked_ip(IpAddr::V6(ip)) {
                    return Err(ResolveErrorType::Blocked);
                }
                Ok(None)
            }
            url::Host::Domain(domain) => {
                let addrs: Vec<SocketAddr> =
                    match timeout(self.timeout, lookup_host((domain, port))).await {
                        Err(_) => return Err(ResolveErrorType::Timeout),
                        Ok(Err(_)) => return Err(ResolveErrorType::Dns),
                        Ok(Ok(addrs)) => addrs.collect(),
                    };
                if addrs.is_empty() {
                    return Err(ResolveErrorType::Dns);
                }
                // Any blocked answer rejects the hop: an attacker-controlled
                // zone can mix public and internal records.
                if let Some(bad) = addrs.iter().find(|a| is_blocked_ip(a.ip())) {
                    warn!(ip = %bad.ip(), "blocked connection into restricted address space");
                    return Err(ResolveErrorType::Blocked);
                }
                Ok(Some((domain.to_string(), addrs[0].ip())))
            }
        }
    }

    fn classify_send_error(e: &reqwest::Error) -> ResolveErrorType {
        if e.is_timeout() {
            ResolveErrorType::Timeout
        } else {
            ResolveErrorType::Unknown
        }
    }
}

#[async_trait]
impl UrlResolve for SsrfSafeResolver {
    async fn resolve(&self, input: &str) -> UrlResolution {
        let mut current = match Url::parse(input) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => {
                return UrlResolution {
                    final_url: input.to_string(),
                    redirect_count: 0,
                    reachable: false,
                    status_code: None,
                    error_type: Some(ResolveErrorType::Unknown),
                }
            }
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut redirects: u32 = 0;

        loop {
            if !visited.insert(current.to_string()) {
                debug!("redirect loop detected");
                return UrlResolution::failed(&current, redirects, ResolveErrorType::Unknown);
            }

            // Re-resolve and re-check before every hop; the fetch below is
            // pinned to the vetted address.
            let pin = match self.vet_host(&current).await {
                Ok(pin) => pin,
                Err(error) => return UrlResolution::failed(&current, redirects, error),
            };

            let mut builder = reqwest::Client::builder()
                .redirect(Policy::none())
                .timeout(self.timeout)
                .user_agent(USER_AGENT);
            if let Some((domain, ip)) = &pin {
                let port = current.port_or_known_default().unwrap_or(443);
                builder = builder.resolve(domain, SocketAddr::new(*ip, port));
            }
            let client = match builder.build() {
                Ok(c) => c,
                Err(_) => {
                    return UrlResolution::failed(&current, redirects, ResolveErrorType::Unknown)
                }
            };

            let response = match client.get(current.clone()).send().await {
                Ok(r) => r,
                Err(e) => {
                    return UrlResolution::failed(
                        &current,
                        redirects,
                        Self::classify_send_error(&e),
                    )
                }
            };

            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok());
                let Some(location) = location else {
                    // Redirect status without a target: treat as terminal
                    return UrlResolution {
                        final_url: current.to_string(),
                        redirect_count: redirects,
                        reachable: true,
                        status_code: Some(status.as_u16()),
                        error_type: None,
                    };
                };
                let next = match current.join(location) {
                    Ok(u) => u,
                    Err(_) => {
                        return UrlResolution::failed(
                            &current,
                            redirects,
                            ResolveErrorType::Unknown,
                        )
                    }
                };

                redirects += 1;
                // Hop bound exceeded is an unknown error, not a security
                // violation.
                if redirects > self.max_redirects {
                    debug!(max = self.max_redirects, "redirect bound exceeded");
                    return UrlResolution::failed(&next, redirects, ResolveErrorType::Unknown);
                }
                current = next;
                continue;
            }

            return UrlResolution {
                final_url: current.to_string(),
                redirect_count: redirects,
                reachable: true,
                status_code: Some(status.as_u16()),
                error_type: None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_blocked_v4_ranges() {
        for ip in [
            "127.0.0.1",
            "127.8.8.8",
            "10.0.0.1",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.1.1",
            "169.254.169.254", // cloud metadata
            "169.254.0.1",
            "0.0.0.0",
            "224.0.0.1",
            "255.255.255.255",
            "100.64.0.1",
            "192.0.0.170",
        ] {
            let ip: Ipv4Addr = ip.parse().unwrap();
            assert!(is_blocked_v4(ip), "{} should be blocked", ip);
        }
    }

    #[test]
    fn test_public_v4_allowed() {
        for ip in ["1.1.1.1", "8.8.8.8", "93.184.216.34", "172.32.0.1"] {
            let ip: Ipv4Addr = ip.parse().unwrap();
            assert!(!is_blocked_v4(ip), "{} should be allowed", ip);
        }
    }

    #[test]
    fn test_blocked_v6_ranges() {
        for ip in [
            "::1",
            "::",
            "fe80::1",
            "fc00::1",
            "fd00:ec2::254", // AWS metadata
            "ff02::1",
            "::ffff:127.0.0.1",
            "::ffff:192.168.0.1",
        ] {
            let ip: Ipv6Addr = ip.parse().unwrap();
            assert!(is_blocked_ip(IpAddr::V6(ip)), "{} should be blocked", ip);
        }
    }

    #[test]
    fn test_public_v6_allowed() {
        let ip: Ipv6Addr = "2606:4700:4700::1111".parse().unwrap();
        assert!(!is_blocked_ip(IpAddr::V6(ip)));
    }

    #[tokio::test]
    async fn test_ip_literal_urls_blocked_without_connecting() {
        let resolver = SsrfSafeResolver::new(5, Duration::from_secs(1));
        for u in [
            "http://127.0.0.1/",
            "http://169.254.169.254/latest/meta-data/",
            "http://10.0.0.1/admin",
            "http://[::1]:8080/",
            "http://192.168.0.1/",
        ] {
            let res = resolver.resolve(u).await;
            assert!(!res.reachable);
            assert_eq!(res.error_type, Some(ResolveErrorType::Blocked), "{}", u);
        }
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_unknown() {
        let resolver = SsrfSafeResolver::new(5, Duration::from_secs(1));
        let res = resolver.resolve("ftp://example.com/file").await;
        assert!(!res.reachable);
        assert_eq!(res.error_type, Some(ResolveErrorType::Unknown));
    }
}

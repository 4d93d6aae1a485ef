//! Short-circuiting callbacks.

use std::net::IpAddr;

use futures::future::BoxFuture;
use log::debug;
use url::{Host, Url};

use crate::chain::{Callback, Chain};
use crate::error_handling::{Error, Result};
use crate::message::Response;

/// Answers every request with a copy of a fixed response.
///
/// Nothing after it in the chain runs and nothing is sent. Useful for mocks,
/// dry runs and canned answers.
#[derive(Debug, Clone)]
pub struct Respond {
    response: Response,
}

impl Respond {
    pub fn new(response: Response) -> Self {
        Self { response }
    }
}

impl Callback for Respond {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            debug!(
                "Answering {} {} without sending it",
                chain.request().method(),
                chain.request().url()
            );
            Ok(self.response.clone())
        })
    }
}

/// Refuses requests to listed hosts with [`Error::Rejected`].
///
/// Domain comparison is ASCII case-insensitive and also matches subdomains:
/// denying `example.com` refuses `api.example.com` too. IP addresses match
/// exactly, IPv6 ones in any notation, with or without brackets.
#[derive(Debug, Clone)]
pub struct DenyHosts {
    hosts: Vec<String>,
    addrs: Vec<IpAddr>,
}

impl DenyHosts {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deny = Self {
            hosts: Vec::new(),
            addrs: Vec::new(),
        };
        for host in hosts {
            let host = normalize_host(&host.into());
            match host.parse::<IpAddr>() {
                Ok(addr) => deny.addrs.push(addr),
                Err(_) => deny.hosts.push(host),
            }
        }
        deny
    }

    /// Whether requests to `host` are refused.
    pub fn denies(&self, host: &str) -> bool {
        let host = normalize_host(host);
        if let Ok(addr) = host.parse::<IpAddr>() {
            return self.denies_addr(addr);
        }
        self.hosts.iter().any(|denied| {
            host == *denied
                || host
                    .strip_suffix(denied.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    fn denies_addr(&self, addr: IpAddr) -> bool {
        self.addrs.contains(&addr)
    }

    fn denies_url(&self, url: &Url) -> bool {
        match url.host() {
            Some(Host::Domain(domain)) => self.denies(domain),
            Some(Host::Ipv4(addr)) => self.denies_addr(IpAddr::V4(addr)),
            Some(Host::Ipv6(addr)) => self.denies_addr(IpAddr::V6(addr)),
            None => false,
        }
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.trim_end_matches('.').to_ascii_lowercase()
}

impl Callback for DenyHosts {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let url = chain.request().url();
            if self.denies_url(url) {
                let host = url.host_str().unwrap_or_default();
                return Err(Error::Rejected(format!("host {host} is denied")));
            }
            let request = chain.request().clone();
            chain.proceed(request).await
        })
    }
}

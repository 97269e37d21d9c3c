//! Host identity used as template substitution values.
//!
//! The fully-qualified host name comes from the local resolver. A bare name
//! gets one of two configured domains appended, chosen by classifying the
//! local network from the outbound address of a UDP socket. The user name
//! comes from the environment when it names one.

use std::net::{IpAddr, UdpSocket};

use crate::config::HostConfig;

/// Platforms that are never on the home network and are not probed.
const UNPROBED_PLATFORMS: &[&str] = &["hpux"];

/// Environment variables consulted for the user name, in order.
const USER_VARS: &[&str] = &["LOGNAME", "USER", "LNAME", "USERNAME"];

/// Values substituted into templates, resolved at most once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub fqdn: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkClass {
    Home,
    NotHome,
}

/// Source of the local address used for outbound traffic.
pub trait NetworkProbe: Send + Sync {
    fn outbound_address(&self) -> std::io::Result<IpAddr>;
}

/// Live probe: "connects" a UDP socket, which sends nothing, and reads back
/// the local address the kernel picked for the route.
pub struct UdpProbe {
    target: String,
}

impl UdpProbe {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl NetworkProbe for UdpProbe {
    fn outbound_address(&self) -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(self.target.as_str())?;
        Ok(socket.local_addr()?.ip())
    }
}

/// Classify the network this host is on.
///
/// A probe failure counts as home: the home network is the one that may
/// have no route out.
pub fn classify_network(
    platform: &str,
    probe: &dyn NetworkProbe,
    home_address_prefix: &str,
) -> NetworkClass {
    if UNPROBED_PLATFORMS.iter().any(|p| platform.contains(p)) {
        return NetworkClass::NotHome;
    }

    match probe.outbound_address() {
        Ok(addr) if addr.to_string().starts_with(home_address_prefix) => NetworkClass::Home,
        Ok(addr) => {
            tracing::debug!(%addr, "outbound address outside home prefix");
            NetworkClass::NotHome
        }
        Err(e) => {
            tracing::debug!(error = %e, "network probe failed, assuming home network");
            NetworkClass::Home
        }
    }
}

/// Qualify `hostname` with a domain unless it already has one.
///
/// `classify` only runs when a domain has to be chosen.
pub fn resolve_fqdn(
    hostname: &str,
    classify: impl FnOnce() -> NetworkClass,
    config: &HostConfig,
) -> String {
    if hostname.contains('.') {
        return hostname.to_owned();
    }

    let domain = match classify() {
        NetworkClass::Home => &config.home_domain,
        NetworkClass::NotHome => &config.other_domain,
    };
    format!("{hostname}.{domain}")
}

/// First non-empty user name among `LOGNAME`, `USER`, `LNAME`, `USERNAME`.
///
/// `None` means the environment names no user and the account database
/// has to be asked instead.
pub fn user_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    USER_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|name| !name.is_empty())
}

/// Environment lookup for [`user_from_env`] backed by this process.
pub fn process_env(var: &str) -> Option<String> {
    // arch-lint: allow(no-silent-result-drop) reason="an unset or non-UTF-8 variable moves on to the next candidate"
    std::env::var(var).ok()
}

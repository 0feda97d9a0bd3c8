//! Host identity reported alongside the latest sample

use std::net::IpAddr;

/// Address and name of the machine serving the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Last non-loopback IPv4 address, if any interface has one
    pub ip: Option<String>,
    pub hostname: String,
}

impl HostIdentity {
    /// Inspect the local interfaces and host name
    pub fn detect() -> Self {
        let ip = match if_addrs::get_if_addrs() {
            Ok(interfaces) => last_external_ipv4(interfaces.iter().map(|i| i.ip())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to enumerate network interfaces");
                None
            }
        };

        Self {
            ip,
            hostname: detect_hostname(),
        }
    }
}

/// Last non-loopback IPv4 address in interface order
fn last_external_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<String> {
    addrs
        .into_iter()
        .filter(|addr| addr.is_ipv4() && !addr.is_loopback())
        .last()
        .map(|addr| addr.to_string())
}

fn detect_hostname() -> String {
    sysinfo::System::host_name()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("Host name unavailable, reporting localhost");
            "localhost".to_string()
        })
}

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::error::{ConfGenError, Result};
use crate::hardware::probe::{Probe, ProbeSource};
use crate::hardware::types::UNSPECIFIED_ADDR;

/// Address of the first interface in `interfaces` that reports one.
///
/// An interface that is missing, down or unparseable is skipped.
pub fn collect_ip_address(probe: &dyn Probe, interfaces: &[String]) -> String {
    for interface in interfaces {
        let result = probe
            .read(&ProbeSource::IpAddress(interface.clone()))
            .and_then(|text| parse_ip_addr(&text));
        match result {
            Ok(Some(addr)) => return addr.to_string(),
            Ok(None) => debug!(interface = %interface, "interface has no IPv4 address"),
            Err(err) => debug!(interface = %interface, error = %err, "interface lookup failed"),
        }
    }

    warn!(?interfaces, "no interface reported an address, using {}", UNSPECIFIED_ADDR);
    UNSPECIFIED_ADDR.to_string()
}

/// Parse one line of `ip -o -4 addr show dev <iface>`:
/// `2: eno1    inet 10.0.0.5/24 brd 10.0.0.255 scope global eno1 ...`.
/// Empty output means the interface carries no address.
pub fn parse_ip_addr(text: &str) -> Result<Option<Ipv4Addr>> {
    let Some(line) = text.lines().find(|l| !l.trim().is_empty()) else {
        return Ok(None);
    };

    let token = line
        .split_whitespace()
        .nth(3)
        .ok_or_else(|| ConfGenError::parse("ip address", format!("short line '{}'", line)))?;
    let addr = token.split('/').next().unwrap_or(token);

    addr.parse::<Ipv4Addr>()
        .map(Some)
        .map_err(|_| ConfGenError::parse("ip address", format!("bad address '{}'", addr)))
}

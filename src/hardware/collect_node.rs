use crate::error::{ConfGenError, Result};
use crate::hardware::fallback::or_fallback;
use crate::hardware::probe::{Probe, ProbeSource};
use crate::hardware::types::UNKNOWN;

pub fn collect_hostname(probe: &dyn Probe) -> String {
    let result = probe
        .read(&ProbeSource::Hostname)
        .and_then(|text| parse_hostname(&text));
    or_fallback("hostname", result, UNKNOWN.to_string())
}

/// Short host name: first line, cut at the first '.'.
pub fn parse_hostname(text: &str) -> Result<String> {
    let first = text.lines().next().unwrap_or("").trim();
    let short = first.split('.').next().unwrap_or(first);
    if short.is_empty() {
        return Err(ConfGenError::parse("hostname", "empty output"));
    }
    Ok(short.to_string())
}

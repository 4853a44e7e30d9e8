use crate::error::{ConfGenError, Result};
use crate::hardware::fallback::or_fallback;
use crate::hardware::probe::{Probe, ProbeSource};
use crate::hardware::types::MemoryInfo;

pub fn collect_memory_info(probe: &dyn Probe, reserve_percent: u8) -> MemoryInfo {
    let result = probe
        .read(&ProbeSource::Memory)
        .and_then(|text| parse_mem_total_kb(&text));
    let total_mib = or_fallback("memory", result, 0) / 1024;

    MemoryInfo {
        total_mib,
        usable_mib: apply_reservation(total_mib, reserve_percent),
    }
}

/// Value of the `MemTotal: <n> kB` line.
pub fn parse_mem_total_kb(text: &str) -> Result<u64> {
    let line = text
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .ok_or_else(|| ConfGenError::parse("memory", "no MemTotal line"))?;

    let mut fields = line["MemTotal:".len()..].split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(value), Some("kB")) => value
            .parse()
            .map_err(|_| ConfGenError::parse("memory", format!("bad MemTotal value '{}'", value))),
        _ => Err(ConfGenError::parse("memory", format!("malformed line '{}'", line))),
    }
}

/// Memory left after holding back `reserve_percent`, rounded down.
pub fn apply_reservation(total_mib: u64, reserve_percent: u8) -> u64 {
    let keep = 100 - u64::from(reserve_percent.min(100));
    total_mib * keep / 100
}

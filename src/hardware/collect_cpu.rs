use crate::error::{ConfGenError, Result};
use crate::hardware::fallback::or_fallback;
use crate::hardware::probe::{Probe, ProbeSource};
use crate::hardware::types::{CpuTopology, UNKNOWN};

pub fn collect_cpu_topology(probe: &dyn Probe) -> CpuTopology {
    let result = probe
        .read(&ProbeSource::Topology)
        .and_then(|text| parse_topology(&text));
    or_fallback("cpu topology", result, CpuTopology::FALLBACK)
}

pub fn collect_cpu_model(probe: &dyn Probe) -> String {
    let result = probe
        .read(&ProbeSource::CpuModel)
        .and_then(|text| parse_model_name(&text))
        .map(|name| normalize_model_name(&name));
    or_fallback("cpu model", result, UNKNOWN.to_string())
}

/// Parse `lscpu --parse=cpu,core,socket` rows. Each count is the highest id in its column plus one.
pub fn parse_topology(text: &str) -> Result<CpuTopology> {
    let mut max_ids: Option<[u32; 3]> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(ConfGenError::parse("cpu topology", format!("short row '{}'", line)));
        }

        let mut row = [0u32; 3];
        for (slot, field) in row.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| ConfGenError::parse("cpu topology", format!("bad id '{}' in row '{}'", field, line)))?;
        }

        let max = max_ids.get_or_insert(row);
        for (m, v) in max.iter_mut().zip(row) {
            *m = (*m).max(v);
        }
    }

    let [cpu, core, socket] = max_ids.ok_or_else(|| ConfGenError::parse("cpu topology", "no rows"))?;
    Ok(CpuTopology {
        cpus: count_from_max_id(cpu)?,
        cores: count_from_max_id(core)?,
        sockets: count_from_max_id(socket)?,
    })
}

fn count_from_max_id(id: u32) -> Result<u32> {
    id.checked_add(1)
        .ok_or_else(|| ConfGenError::parse("cpu topology", format!("id {} out of range", id)))
}

/// First `model name` value in cpuinfo-style text.
pub fn parse_model_name(text: &str) -> Result<String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "model name")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfGenError::parse("cpu model", "no 'model name' field"))
}

struct VendorRule {
    marker: &'static str,
    normalize: fn(&str) -> Option<String>,
}

const VENDOR_RULES: &[VendorRule] = &[
    VendorRule {
        marker: "Intel(R)",
        normalize: normalize_intel,
    },
    VendorRule {
        marker: "AMD ",
        normalize: normalize_amd,
    },
];

/// Shorten a model name to a `<family>-<number>` tag, e.g.
/// `Intel(R) Xeon(R) CPU E5-2680 0 @ 2.40GHz` becomes `Xeon-E5-2680`.
/// Names from unrecognised vendors are returned trimmed but otherwise untouched.
pub fn normalize_model_name(raw: &str) -> String {
    let raw = raw.trim();
    VENDOR_RULES
        .iter()
        .find(|rule| raw.starts_with(rule.marker))
        .and_then(|rule| (rule.normalize)(raw))
        .unwrap_or_else(|| raw.to_string())
}

fn normalize_intel(raw: &str) -> Option<String> {
    let before_clock = raw.split('@').next().unwrap_or(raw);
    let cleaned = before_clock.replace("(R)", "").replace("(TM)", "");

    let mut tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !matches!(*t, "Intel" | "CPU" | "Processor"))
        .collect();

    // Older Xeons carry a stepping placeholder: "E5-2680 0".
    if tokens.len() > 2 && tokens.last() == Some(&"0") {
        tokens.pop();
    }

    join_tag(&tokens)
}

fn normalize_amd(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw
        .split_whitespace()
        .filter(|t| !matches!(*t, "AMD" | "Processor"))
        .filter(|t| !t.ends_with("-Core"))
        .collect();
    join_tag(&tokens)
}

fn join_tag(tokens: &[&str]) -> Option<String> {
    match tokens {
        [] | [_] => None,
        _ => Some(tokens.join("-")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::probe::FixedProbe;

    const LSCPU_2S: &str = "\
# The following is the parsable format, which can be fed to other
# programs. Each different item in every column has an unique ID
# starting from zero.
# CPU,Core,Socket
0,0,0
1,1,0
2,2,1
3,3,1
4,0,0
5,1,0
6,2,1
7,3,1
";

    #[test]
    fn test_parse_topology_counts_max_plus_one() {
        let topo = parse_topology(LSCPU_2S).unwrap();
        assert_eq!(topo, CpuTopology { cpus: 8, cores: 4, sockets: 2 });
    }

    #[test]
    fn test_parse_topology_rejects_garbage() {
        assert!(parse_topology("").is_err());
        assert!(parse_topology("# only comments\n").is_err());
        assert!(parse_topology("0,0\n").is_err());
        assert!(parse_topology("0,,0\n").is_err());
        assert!(parse_topology("a,b,c\n").is_err());
    }

    #[test]
    fn test_topology_falls_back_to_ones() {
        let probe = FixedProbe::new().with(ProbeSource::Topology, "garbage");
        assert_eq!(collect_cpu_topology(&probe), CpuTopology::FALLBACK);

        let missing = FixedProbe::new();
        assert_eq!(collect_cpu_topology(&missing), CpuTopology { cpus: 1, cores: 1, sockets: 1 });
    }

    #[test]
    fn test_out_of_range_id_falls_back() {
        assert!(parse_topology("4294967295,0,0\n").is_err());
        let probe = FixedProbe::new().with(ProbeSource::Topology, "4294967295,0,0\n");
        assert_eq!(collect_cpu_topology(&probe), CpuTopology::FALLBACK);
    }

    #[test]
    fn test_normalize_xeon_e5_drops_zero() {
        assert_eq!(normalize_model_name("Intel(R) Xeon(R) CPU E5-2680 0 @ 2.40GHz"), "Xeon-E5-2680");
    }

    #[test]
    fn test_normalize_xeon_gold() {
        assert_eq!(normalize_model_name("Intel(R) Xeon(R) Gold 6142 CPU @ 2.60GHz"), "Xeon-Gold-6142");
        assert_eq!(normalize_model_name("Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz"), "Xeon-E5-2680-v4");
    }

    #[test]
    fn test_normalize_amd() {
        assert_eq!(normalize_model_name("AMD EPYC 7742 64-Core Processor"), "EPYC-7742");
    }

    #[test]
    fn test_unknown_vendor_kept_raw() {
        assert_eq!(normalize_model_name("  Neoverse-N1  "), "Neoverse-N1");
        assert_eq!(normalize_model_name("Intel(R) Pentium(R)"), "Intel(R) Pentium(R)");
    }

    #[test]
    fn test_collect_cpu_model_from_cpuinfo() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: Intel(R) Xeon(R) Gold 6142 CPU @ 2.60GHz\nstepping\t: 4\n";
        let probe = FixedProbe::new().with(ProbeSource::CpuModel, cpuinfo);
        assert_eq!(collect_cpu_model(&probe), "Xeon-Gold-6142");
    }

    #[test]
    fn test_cpu_model_falls_back_to_unknown() {
        let probe = FixedProbe::new().with(ProbeSource::CpuModel, "processor\t: 0\n");
        assert_eq!(collect_cpu_model(&probe), "UNKNOWN");
        assert_eq!(collect_cpu_model(&FixedProbe::new()), "UNKNOWN");
    }
}

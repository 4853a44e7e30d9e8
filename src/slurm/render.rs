//! Text rendering of slurm.conf node lines and gres.conf device lines.
//!
//! Both renderers are total: fallback inputs still produce valid lines.

use crate::slurm::gres::{DeviceAssignment, GRES_NAME};
use crate::slurm::NodeConfig;

const NODE_STATE: &str = "UNKNOWN";

/// One `NodeName=... State=UNKNOWN` line. Fields with empty values are left out.
pub fn render_node_line(node: &NodeConfig) -> String {
    let fields: [(&str, String); 10] = [
        ("NodeName", node.hostname.clone()),
        ("NodeAddr", node.ip_address.clone()),
        ("CPUs", node.cpu.cpus.to_string()),
        ("ThreadsPerCore", node.cpu.threads_per_core.to_string()),
        ("CoresPerSocket", node.cpu.cores_per_socket.to_string()),
        ("Sockets", node.cpu.sockets.to_string()),
        ("RealMemory", node.real_memory_mib.to_string()),
        ("Feature", node.feature.clone()),
        ("Gres", node.gres.clone()),
        ("State", NODE_STATE.to_string()),
    ];

    fields
        .iter()
        .map(|(key, value)| (key, collapse_whitespace(value)))
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// gres.conf lines, one per device, newline-separated without a trailing newline.
pub fn render_gres_conf(hostname: &str, devices: &[DeviceAssignment], include_types: bool) -> String {
    devices
        .iter()
        .map(|device| {
            let mut line = format!("NodeName={} Name={} File={}", hostname, GRES_NAME, device.file);
            if include_types {
                line.push_str(" Type=");
                line.push_str(&device.name);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Any whitespace run becomes one space; ends are trimmed.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

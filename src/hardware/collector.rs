use tracing::info;

use crate::config::GeneratorConfig;
use crate::hardware;
use crate::hardware::probe::Probe;
use crate::hardware::types::{Inventory, NodeIdentity};

/// Run every collector once. Each one degrades independently to its fallback.
pub fn collect_full_inventory(probe: &dyn Probe, config: &GeneratorConfig) -> Inventory {
    let node = NodeIdentity {
        hostname: hardware::collect_hostname(probe),
        ip_address: hardware::collect_ip_address(probe, &config.interfaces),
    };
    let cpu = hardware::collect_cpu_topology(probe);
    let cpu_model = hardware::collect_cpu_model(probe);
    let memory = hardware::collect_memory_info(probe, config.memory_reserve_percent);
    let accelerators = hardware::collect_gpus(probe, config.accelerator_source);

    info!(
        hostname = %node.hostname,
        cpus = cpu.cpus,
        memory_mib = memory.total_mib,
        accelerators = accelerators.len(),
        "collected node inventory"
    );

    Inventory {
        node,
        cpu,
        cpu_model,
        memory,
        accelerators,
    }
}

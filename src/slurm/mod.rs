// Slurm configuration fragments built from a collected inventory
pub mod resources;
pub mod gres;
pub mod features;
pub mod render;

use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::hardware::types::Inventory;

pub use gres::{assign_devices, build_gres_value, DeviceAssignment, DeviceIndexSource};
pub use features::build_feature_tag;
pub use render::{render_gres_conf, render_node_line};
pub use resources::{build_cpu_resources, CpuResources, ResourceOptions};

/// Everything a node line needs, already normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub hostname: String,
    pub ip_address: String,
    pub cpu: CpuResources,
    pub real_memory_mib: u64,
    pub feature: String,
    /// Gres value without the `Gres=` key; empty on nodes without accelerators.
    pub gres: String,
}

impl NodeConfig {
    pub fn from_inventory(inventory: &Inventory, config: &GeneratorConfig, options: &ResourceOptions) -> Self {
        Self {
            hostname: inventory.node.hostname.clone(),
            ip_address: inventory.node.ip_address.clone(),
            cpu: build_cpu_resources(&inventory.cpu, options),
            real_memory_mib: inventory.memory.usable_mib,
            feature: build_feature_tag(&inventory.cpu_model, &inventory.accelerators, config.feature_order),
            gres: build_gres_value(&inventory.accelerators, options.include_gpu_types),
        }
    }
}

/// Rendered slurm.conf node line.
pub fn slurm_conf(inventory: &Inventory, config: &GeneratorConfig, options: &ResourceOptions) -> String {
    render_node_line(&NodeConfig::from_inventory(inventory, config, options))
}

/// Rendered gres.conf device lines.
pub fn gres_conf(inventory: &Inventory, config: &GeneratorConfig, options: &ResourceOptions) -> String {
    let index_source = DeviceIndexSource::for_inventory(&inventory.accelerators);
    let devices = assign_devices(&inventory.accelerators, &index_source, &config.device_path_prefix);
    render_gres_conf(&inventory.node.hostname, &devices, options.include_gpu_types)
}

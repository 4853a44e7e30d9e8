use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::GenerateArgs;
use crate::config::GeneratorConfig;
use crate::hardware::collect_full_inventory;
use crate::hardware::probe::{Probe, SystemProbe};
use crate::hardware::types::Inventory;
use crate::output::output_data;
use crate::slurm::{assign_devices, DeviceAssignment, DeviceIndexSource, NodeConfig, ResourceOptions};

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub agent_version: String,
    pub collected_at: DateTime<Utc>,
    pub options: ResourceOptions,
    pub inventory: Inventory,
    pub node: NodeConfig,
    pub devices: Vec<DeviceAssignment>,
}

pub fn handle_inventory_command(
    args: &GenerateArgs,
    format: &str,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GeneratorConfig::load(config_path)?;
    args.apply_to(&mut config);
    config.validate()?;

    let probe = SystemProbe::new(config.probe_timeout());
    let report = build_report(&probe, &config);
    output_data(&report, format)?;
    Ok(())
}

pub fn build_report(probe: &dyn Probe, config: &GeneratorConfig) -> InventoryReport {
    let inventory = collect_full_inventory(probe, config);
    let options = config.resource_options();
    let node = NodeConfig::from_inventory(&inventory, config, &options);
    let index_source = DeviceIndexSource::for_inventory(&inventory.accelerators);
    let devices = assign_devices(&inventory.accelerators, &index_source, &config.device_path_prefix);

    InventoryReport {
        agent_version: AGENT_VERSION.to_string(),
        collected_at: Utc::now(),
        options,
        inventory,
        node,
        devices,
    }
}

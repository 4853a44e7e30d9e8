use nvml_wrapper::Nvml;
use tracing::debug;

use crate::config::AcceleratorSource;
use crate::error::Result;
use crate::hardware::probe::{Probe, ProbeSource};
use crate::hardware::types::{Accelerator, AcceleratorInventory};

/// Accelerators attached to the node. A node without GPUs, or without the
/// management tool, simply has an empty inventory.
pub fn collect_gpus(probe: &dyn Probe, source: AcceleratorSource) -> AcceleratorInventory {
    let result = match source {
        AcceleratorSource::Smi => probe
            .read(&ProbeSource::Accelerators)
            .map(|text| parse_gpu_names(&text)),
        AcceleratorSource::Nvml => collect_with_nvml(),
    };

    match result {
        Ok(inventory) => inventory,
        Err(err) => {
            debug!(error = %err, ?source, "no accelerators reported");
            AcceleratorInventory::default()
        }
    }
}

/// One device name per non-blank line, with whitespace removed so each
/// name stays a single token (`Tesla V100-SXM2-16GB` -> `TeslaV100-SXM2-16GB`).
pub fn parse_gpu_names(text: &str) -> AcceleratorInventory {
    AcceleratorInventory::from_names(text.lines().map(compact_name).filter(|name| !name.is_empty()))
}

pub fn compact_name(name: &str) -> String {
    name.split_whitespace().collect()
}

fn collect_with_nvml() -> Result<AcceleratorInventory> {
    let nvml = Nvml::init()?;
    let device_count = nvml.device_count()?;

    let mut devices = Vec::with_capacity(device_count as usize);
    for i in 0..device_count {
        let device = nvml.device_by_index(i)?;
        let name = device.name().unwrap_or_else(|_| format!("GPU {}", i));
        let minor_number = match device.minor_number() {
            Ok(minor) => Some(minor),
            Err(err) => {
                debug!(index = i, error = %err, "minor number unavailable");
                None
            }
        };

        devices.push(Accelerator {
            name: compact_name(&name),
            minor_number,
        });
    }

    Ok(AcceleratorInventory { devices })
}

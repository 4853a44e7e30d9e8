//! Generic-resource (Gres) description of the node's accelerators.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::hardware::types::AcceleratorInventory;

pub const GRES_NAME: &str = "gpu";

/// The `Gres=` value for a node line, without the key. Empty when there are no accelerators.
///
/// With `include_types` devices are counted per name (`gpu:TeslaP100:1,gpu:TeslaV100:2`,
/// sorted by name); otherwise a single total is emitted (`gpu:3`).
pub fn build_gres_value(inventory: &AcceleratorInventory, include_types: bool) -> String {
    if inventory.is_empty() {
        return String::new();
    }

    if !include_types {
        return format!("{}:{}", GRES_NAME, inventory.len());
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in inventory.names() {
        *counts.entry(name).or_default() += 1;
    }

    counts
        .iter()
        .map(|(name, count)| format!("{}:{}:{}", GRES_NAME, name, count))
        .collect::<Vec<_>>()
        .join(",")
}

/// Where each device's file index comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceIndexSource {
    /// Position in the accelerator listing. The listing tool does not promise
    /// to follow kernel device numbering, so on mixed or re-enumerated nodes
    /// this can pair a name with the wrong `/dev/nvidia<n>`.
    ReportOrder,
    /// Indices from an authoritative source, one per device in listing order.
    Explicit(Vec<u32>),
}

impl DeviceIndexSource {
    /// Minor numbers when the inventory carries one for every device, report order otherwise.
    pub fn for_inventory(inventory: &AcceleratorInventory) -> Self {
        match inventory.minor_numbers() {
            Some(minors) => DeviceIndexSource::Explicit(minors),
            None => DeviceIndexSource::ReportOrder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceAssignment {
    pub name: String,
    pub file: String,
}

/// Pair every accelerator with its device file.
pub fn assign_devices(
    inventory: &AcceleratorInventory,
    source: &DeviceIndexSource,
    path_prefix: &str,
) -> Vec<DeviceAssignment> {
    let indices: Vec<u32> = match source {
        DeviceIndexSource::Explicit(indices) if indices.len() == inventory.len() => indices.clone(),
        DeviceIndexSource::Explicit(indices) => {
            warn!(
                expected = inventory.len(),
                got = indices.len(),
                "device index list does not match accelerator count, using report order"
            );
            (0..inventory.len() as u32).collect()
        }
        DeviceIndexSource::ReportOrder => (0..inventory.len() as u32).collect(),
    };

    inventory
        .names()
        .zip(indices)
        .map(|(name, index)| DeviceAssignment {
            name: name.to_string(),
            file: format!("{}{}", path_prefix, index),
        })
        .collect()
}

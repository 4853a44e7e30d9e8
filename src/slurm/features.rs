use std::collections::{BTreeSet, HashSet};

use crate::config::FeatureOrder;
use crate::hardware::types::AcceleratorInventory;

/// Comma-joined feature list: the CPU model tag, then each distinct accelerator name.
pub fn build_feature_tag(cpu_model: &str, inventory: &AcceleratorInventory, order: FeatureOrder) -> String {
    let mut features = vec![cpu_model];

    match order {
        FeatureOrder::Sorted => {
            let distinct: BTreeSet<&str> = inventory.names().collect();
            features.extend(distinct);
        }
        FeatureOrder::ReportOrder => {
            let mut seen = HashSet::new();
            features.extend(inventory.names().filter(|name| seen.insert(*name)));
        }
    }

    features.join(",")
}

use serde::Serialize;

/// Sentinel used for text fields whose probe failed.
pub const UNKNOWN: &str = "UNKNOWN";

/// Address reported when no interface yields one.
pub const UNSPECIFIED_ADDR: &str = "0.0.0.0";

#[derive(Debug, Serialize)]
pub struct Inventory {
    pub node: NodeIdentity,
    pub cpu: CpuTopology,
    pub cpu_model: String,
    pub memory: MemoryInfo,
    pub accelerators: AcceleratorInventory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeIdentity {
    pub hostname: String,
    pub ip_address: String,
}

/// Logical CPU, core and socket counts.
///
/// Collected values are always at least 1 so downstream ratios never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuTopology {
    pub cpus: u32,
    pub cores: u32,
    pub sockets: u32,
}

impl CpuTopology {
    pub const FALLBACK: CpuTopology = CpuTopology {
        cpus: 1,
        cores: 1,
        sockets: 1,
    };
}

impl Default for CpuTopology {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    /// MemTotal in whole MiB, 0 when unavailable.
    pub total_mib: u64,
    /// Memory offered to the scheduler after the reservation.
    pub usable_mib: u64,
}

/// One accelerator as reported by the listing tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accelerator {
    pub name: String,
    /// Kernel device minor number, when the source knows it.
    pub minor_number: Option<u32>,
}

/// Accelerators in probe-report order; one entry per physical device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceleratorInventory {
    pub devices: Vec<Accelerator>,
}

impl AcceleratorInventory {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            devices: names
                .into_iter()
                .map(|name| Accelerator {
                    name: name.into(),
                    minor_number: None,
                })
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Minor numbers for every device, or `None` if any device lacks one.
    pub fn minor_numbers(&self) -> Option<Vec<u32>> {
        if self.devices.is_empty() {
            return None;
        }
        self.devices.iter().map(|d| d.minor_number).collect()
    }
}

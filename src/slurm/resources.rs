use serde::{Deserialize, Serialize};

use crate::hardware::types::CpuTopology;

/// Caller-selected rendering policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOptions {
    /// Bucket Gres by accelerator name and tag gres.conf lines with `Type=`.
    pub include_gpu_types: bool,
    /// Report hardware threads as CPUs instead of physical cores.
    pub include_hyperthreads: bool,
}

/// CPU fields of a node line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuResources {
    pub cpus: u32,
    pub threads_per_core: u32,
    pub cores_per_socket: u32,
    pub sockets: u32,
}

/// Derive node-line CPU counts. Ratios use floor division; a zero divisor is treated as 1.
pub fn build_cpu_resources(topology: &CpuTopology, options: &ResourceOptions) -> CpuResources {
    let cpus = if options.include_hyperthreads {
        topology.cpus
    } else {
        topology.cores
    };

    CpuResources {
        cpus,
        threads_per_core: topology.cpus / topology.cores.max(1),
        cores_per_socket: topology.cores / topology.sockets.max(1),
        sockets: topology.sockets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(cpus: u32, cores: u32, sockets: u32) -> CpuTopology {
        CpuTopology { cpus, cores, sockets }
    }

    #[test]
    fn test_physical_cores_reported_by_default() {
        let res = build_cpu_resources(&topology(32, 16, 2), &ResourceOptions::default());
        assert_eq!(
            res,
            CpuResources {
                cpus: 16,
                threads_per_core: 2,
                cores_per_socket: 8,
                sockets: 2,
            }
        );
    }

    #[test]
    fn test_hyperthreads_reported_when_asked() {
        let options = ResourceOptions {
            include_hyperthreads: true,
            ..Default::default()
        };
        let res = build_cpu_resources(&topology(16, 8, 1), &options);
        assert_eq!(res.cpus, 16);
        assert_eq!(res.threads_per_core, 2);
    }

    #[test]
    fn test_ratios_truncate() {
        let res = build_cpu_resources(&topology(12, 5, 2), &ResourceOptions::default());
        assert_eq!(res.threads_per_core, 2);
        assert_eq!(res.cores_per_socket, 2);
    }

    #[test]
    fn test_fallback_topology() {
        let res = build_cpu_resources(&CpuTopology::FALLBACK, &ResourceOptions::default());
        assert_eq!(res, CpuResources { cpus: 1, threads_per_core: 1, cores_per_socket: 1, sockets: 1 });
    }

    #[test]
    fn test_zero_counts_do_not_panic() {
        let res = build_cpu_resources(&topology(4, 0, 0), &ResourceOptions::default());
        assert_eq!(res.threads_per_core, 4);
        assert_eq!(res.cores_per_socket, 0);
    }
}

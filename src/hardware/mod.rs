// Hardware inventory collection modules
pub mod types;
pub mod probe;
pub mod fallback;
pub mod collect_memory;
pub mod collect_cpu;
pub mod collect_network;
pub mod collect_gpus;
pub mod collect_node;
pub mod collector;

// Re-export main collection functions
pub use collect_memory::collect_memory_info;
pub use collect_cpu::{collect_cpu_model, collect_cpu_topology};
pub use collect_network::collect_ip_address;
pub use collect_gpus::collect_gpus;
pub use collect_node::collect_hostname;
pub use collector::collect_full_inventory;

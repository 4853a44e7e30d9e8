pub mod generate;
pub mod inventory;

pub use generate::handle_generate_command;
pub use inventory::handle_inventory_command;

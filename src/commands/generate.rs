use std::path::Path;

use tracing::info;

use crate::cli::{GenerateArgs, Target};
use crate::config::GeneratorConfig;
use crate::hardware::collect_full_inventory;
use crate::hardware::probe::{Probe, SystemProbe};
use crate::output::{print_success, write_fragment};
use crate::slurm::{gres_conf, slurm_conf};

pub fn handle_generate_command(
    target: &str,
    args: &GenerateArgs,
    output_dir: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject the selector before touching the hardware.
    let target: Target = target.parse()?;

    let mut config = GeneratorConfig::load(config_path)?;
    args.apply_to(&mut config);
    config.validate()?;

    let probe = SystemProbe::new(config.probe_timeout());
    for (file_name, fragment) in generate(&probe, &config, target) {
        match output_dir {
            Some(dir) => {
                let path = write_fragment(dir, &file_name, &fragment)?;
                print_success(&format!("Wrote {}", path.display()));
            }
            None => println!("{}", fragment),
        }
    }
    Ok(())
}

/// Collect once and render the requested fragments as `(file name, text)` pairs.
pub fn generate(probe: &dyn Probe, config: &GeneratorConfig, target: Target) -> Vec<(String, String)> {
    let inventory = collect_full_inventory(probe, config);
    let options = config.resource_options();
    let hostname = &inventory.node.hostname;

    let mut fragments = Vec::new();
    if target.includes_slurm() {
        fragments.push((format!("{}-slurm.conf", hostname), slurm_conf(&inventory, config, &options)));
    }
    if target.includes_gres() {
        fragments.push((format!("{}-gres.conf", hostname), gres_conf(&inventory, config, &options)));
    }

    info!(?target, fragments = fragments.len(), "rendered configuration");
    fragments
}

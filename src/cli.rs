use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{AcceleratorSource, FeatureOrder, GeneratorConfig};
use crate::error::ConfGenError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "node-confgen")]
#[command(about = "Generate Slurm node and Gres configuration from local hardware")]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/node-confgen/config.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render configuration fragments
    Generate {
        /// Fragment to produce: slurm, gres or all
        target: String,

        #[command(flatten)]
        options: GenerateArgs,

        /// Write <hostname>-slurm.conf / <hostname>-gres.conf into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Show the collected hardware inventory and derived values
    Inventory {
        #[command(flatten)]
        options: GenerateArgs,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Bucket Gres by accelerator name and add Type= to gres.conf lines
    #[arg(long)]
    pub gpu_types: bool,

    /// Report hardware threads rather than physical cores as CPUs
    #[arg(long)]
    pub hyperthreads: bool,

    /// Network interface to take the node address from; repeat to set the search order
    #[arg(short, long = "interface")]
    pub interfaces: Vec<String>,

    /// Per-probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Where accelerator names come from
    #[arg(long, value_enum)]
    pub accelerator_source: Option<AcceleratorSource>,

    /// Ordering of accelerator names in the Feature list
    #[arg(long, value_enum)]
    pub feature_order: Option<FeatureOrder>,
}

impl GenerateArgs {
    /// Layer command-line flags over the loaded configuration.
    pub fn apply_to(&self, config: &mut GeneratorConfig) {
        config.include_gpu_types |= self.gpu_types;
        config.include_hyperthreads |= self.hyperthreads;
        if !self.interfaces.is_empty() {
            config.interfaces = self.interfaces.clone();
        }
        if let Some(timeout) = self.timeout {
            config.probe_timeout_secs = timeout;
        }
        if let Some(source) = self.accelerator_source {
            config.accelerator_source = source;
        }
        if let Some(order) = self.feature_order {
            config.feature_order = order;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Slurm,
    Gres,
    All,
}

impl FromStr for Target {
    type Err = ConfGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slurm" => Ok(Target::Slurm),
            "gres" => Ok(Target::Gres),
            "all" => Ok(Target::All),
            other => Err(ConfGenError::UnknownTarget(other.to_string())),
        }
    }
}

impl Target {
    pub fn includes_slurm(self) -> bool {
        matches!(self, Target::Slurm | Target::All)
    }

    pub fn includes_gres(self) -> bool {
        matches!(self, Target::Gres | Target::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        assert_eq!("slurm".parse::<Target>().unwrap(), Target::Slurm);
        assert_eq!("gres".parse::<Target>().unwrap(), Target::Gres);
        assert!("all".parse::<Target>().unwrap().includes_gres());
        let err = "nodes".parse::<Target>().unwrap_err();
        assert!(err.to_string().contains("'nodes'"));
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "node-confgen", "-vv", "generate", "gres", "--gpu-types", "-i", "ib0", "-i", "eno1", "--timeout", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate { target, options, output_dir } => {
                assert_eq!(target, "gres");
                assert!(options.gpu_types);
                assert!(!options.hyperthreads);
                assert_eq!(options.interfaces, vec!["ib0", "eno1"]);
                assert_eq!(options.timeout, Some(3));
                assert!(output_dir.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = GenerateArgs {
            hyperthreads: true,
            interfaces: vec!["ib0".to_string()],
            accelerator_source: Some(AcceleratorSource::Nvml),
            ..Default::default()
        };
        let mut config = GeneratorConfig::default();
        args.apply_to(&mut config);
        assert!(config.include_hyperthreads);
        assert!(!config.include_gpu_types);
        assert_eq!(config.interfaces, vec!["ib0"]);
        assert_eq!(config.accelerator_source, AcceleratorSource::Nvml);
        assert_eq!(config.probe_timeout_secs, 10);
    }
}

use clap::{Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;

use edgegrid::config::LayoutKind;
use edgegrid::config_loader;
use edgegrid::orchestrator::{self, GenerateOptions};
use edgegrid::properties::DEFAULT_PROPERTIES;
use edgegrid::topology::{self, DEFAULT_OUTPUT};

/// Grid topology generator for edge computing simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate edge_devices.xml and patch the properties area size
    Generate {
        /// Path to the generator configuration YAML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Layout preset to use without a configuration file
        #[arg(short, long, value_enum)]
        layout: Option<LayoutKind>,

        /// Output path for the topology document
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Properties file whose area size is updated
        #[arg(short, long, default_value = DEFAULT_PROPERTIES)]
        properties: PathBuf,

        /// Leave the properties file untouched
        #[arg(long)]
        no_patch: bool,

        /// Fail on any warning
        #[arg(long)]
        strict: bool,
    },
    /// Check an existing topology document the way the simulator loads it
    Check {
        /// Path to the topology document
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match args.command {
        Command::Generate { config, layout, output, properties, no_patch, strict } => {
            info!("Starting EdgeGrid topology generation");
            let config = config_loader::resolve_config(config.as_deref(), layout)?;

            let options = GenerateOptions {
                output,
                properties: (!no_patch).then_some(properties),
                strict,
            };
            let report = orchestrator::generate(&config, &options)?;

            if !report.warnings.is_empty() {
                warn!("Finished with {} warning(s)", report.warnings.len());
            }
            info!("Generated topology: {:?}", options.output);
        }
        Command::Check { input, json } => {
            let doc = topology::load_topology(&input)?;
            let summary = topology::check_topology(&doc)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} datacenters, {} hosts, {} VMs, {} place type(s)",
                    summary.datacenters, summary.hosts, summary.vms, summary.place_types
                );
            }
        }
    }

    Ok(())
}

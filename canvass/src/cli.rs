//! Définition et implémentation des commandes CLI
//!
//! - `init` : construit (ou recharge) un réseau
//! - `update` : saisie interactive d'un lot, puis carte
//! - `import` / `set` / `rename` / `reset` : mises à jour non interactives
//! - `render` / `summary` : sorties

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use canvass::{Config, Network, NetworkSources, Status, UpdateReport};
use clap::{Args, Subcommand};
use tracing::info;

/// Nom du réseau et sources optionnelles
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Network name (directory under the data dir)
    #[arg(short, long)]
    pub name: String,

    /// Boundary export (.kml/.kmz). Default: <name>.kml
    #[arg(long)]
    pub exterior: Option<PathBuf>,

    /// Regional roads (.shp, .geojson or Geofabrik extract directory)
    #[arg(long)]
    pub roads: Option<PathBuf>,
}

impl NetworkArgs {
    fn sources(&self, config: &Config) -> NetworkSources {
        let defaults = NetworkSources::from_config(config, &self.name);
        NetworkSources {
            exterior: self.exterior.clone().unwrap_or(defaults.exterior),
            roads: self.roads.clone().unwrap_or(defaults.roads),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a network from its sources, or load it from cache
    Init {
        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Enter newly delivered/arranged road names, then render the map
    Update {
        #[command(flatten)]
        network: NetworkArgs,

        /// Save the update report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Apply a road,status CSV (default: the network's own status file)
    Import {
        #[command(flatten)]
        network: NetworkArgs,

        /// Status CSV to apply
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save the update report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Set the status of the given road names
    Set {
        #[command(flatten)]
        network: NetworkArgs,

        /// New status (Yes, No, Arranged)
        #[arg(short, long, value_parser = parse_status)]
        status: Status,

        /// Road names
        #[arg(required = true)]
        roads: Vec<String>,
    },

    /// Rename one road segment by index and realign its status
    Rename {
        #[command(flatten)]
        network: NetworkArgs,

        /// Segment index
        #[arg(short, long)]
        index: usize,

        /// New road name
        #[arg(long)]
        to: String,
    },

    /// Rebuild the roads from the regional dataset, keeping known statuses
    Reset {
        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Write the HTML map
    Render {
        #[command(flatten)]
        network: NetworkArgs,

        /// Output file. Default: <data dir>/<name>/<name>_map.html
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show counts per status
    Summary {
        #[command(flatten)]
        network: NetworkArgs,

        /// Also write the counts as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn parse_status(value: &str) -> Result<Status, String> {
    value.parse().map_err(|e: canvass::NetworkError| e.to_string())
}

fn open(config: &Config, args: &NetworkArgs) -> Result<Network> {
    Network::open(config, &args.name, args.sources(config))
        .with_context(|| format!("Failed to open network '{}'", args.name))
}

fn finish_report(report: &UpdateReport, path: Option<&Path>) -> Result<()> {
    report.display();
    if let Some(path) = path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }
    Ok(())
}

pub fn cmd_init(config: &Config, args: &NetworkArgs) -> Result<()> {
    let network = open(config, args)?;
    let stats = network.stats();
    info!(
        network = %stats.network,
        segments = stats.segments,
        named = stats.distinct_names,
        unnamed = stats.unnamed,
        dir = %network.paths().dir().display(),
        "Network ready"
    );
    Ok(())
}

pub fn cmd_update(config: &Config, args: &NetworkArgs, report_path: Option<&Path>) -> Result<()> {
    let mut network = open(config, args)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let report = network
        .prompt_and_apply(&mut input, &mut output)
        .context("Failed to apply status batch")?;
    println!();

    finish_report(&report, report_path)?;
    let map = network.render(None).context("Failed to render map")?;
    info!(path = %map.display(), "Open the map in a browser");
    Ok(())
}

pub fn cmd_import(
    config: &Config,
    args: &NetworkArgs,
    file: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let mut network = open(config, args)?;
    let report = network
        .import_status_file(file)
        .context("Failed to import status file")?;
    finish_report(&report, report_path)
}

pub fn cmd_set(config: &Config, args: &NetworkArgs, status: Status, roads: &[String]) -> Result<()> {
    let mut network = open(config, args)?;
    let names: Vec<String> = roads
        .iter()
        .flat_map(|arg| network.policy().split_names(arg))
        .collect();

    let report = network
        .apply(names.iter().map(|name| (name.as_str(), status)), "command line")
        .context("Failed to update statuses")?;
    finish_report(&report, None)
}

pub fn cmd_rename(config: &Config, args: &NetworkArgs, index: usize, to: &str) -> Result<()> {
    let mut network = open(config, args)?;
    let report = network
        .rename(index, to)
        .with_context(|| format!("Failed to rename segment {index}"))?;
    info!("{}", report.summary());
    Ok(())
}

pub fn cmd_reset(config: &Config, args: &NetworkArgs) -> Result<()> {
    let mut network = open(config, args)?;
    let report = network.reset().context("Failed to reset network")?;
    finish_report(&report, None)
}

pub fn cmd_render(config: &Config, args: &NetworkArgs, output: Option<&Path>) -> Result<()> {
    let network = open(config, args)?;
    let path = network.render(output).context("Failed to render map")?;
    info!(path = %path.display(), "Open the map in a browser");
    Ok(())
}

pub fn cmd_summary(config: &Config, args: &NetworkArgs, json: Option<&Path>) -> Result<()> {
    let network = open(config, args)?;
    let stats = network.stats();

    println!("Network: {}", stats.network);
    println!("  Segments:        {}", stats.segments);
    println!("  Distinct names:  {}", stats.distinct_names);
    println!("  Unnamed:         {}", stats.unnamed);
    for status in Status::ALL {
        let count = match status {
            Status::Delivered => stats.delivered,
            Status::Arranged => stats.arranged,
            Status::Undelivered => stats.undelivered,
        };
        println!("  {:<16} {}", format!("{status}:"), count);
    }

    if let Some(path) = json {
        let content = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("yes"), Ok(Status::Delivered));
        assert_eq!(parse_status("Arranged"), Ok(Status::Arranged));
        assert!(parse_status("maybe").is_err());
    }

    #[test]
    fn test_sources_defaults() {
        let config = Config {
            roads_file: Some(PathBuf::from("region/roads.geojson")),
            ..Config::default()
        };
        let args = NetworkArgs {
            name: "Ladygrove".to_string(),
            exterior: None,
            roads: None,
        };

        let sources = args.sources(&config);
        assert_eq!(sources.exterior, PathBuf::from("Ladygrove.kml"));
        assert_eq!(sources.roads, PathBuf::from("region/roads.geojson"));
    }

    #[test]
    fn test_sources_explicit() {
        let args = NetworkArgs {
            name: "Ladygrove".to_string(),
            exterior: Some(PathBuf::from("drawn/area.kmz")),
            roads: Some(PathBuf::from("extract/")),
        };

        let sources = args.sources(&Config::default());
        assert_eq!(sources.exterior, PathBuf::from("drawn/area.kmz"));
        assert_eq!(sources.roads, PathBuf::from("extract/"));
    }
}

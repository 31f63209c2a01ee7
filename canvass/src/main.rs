//! Point d'entrée CLI pour canvass

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use canvass::Config;

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Suivre la distribution de tracts rue par rue
#[derive(Parser)]
#[command(name = "canvass")]
#[command(author, version)]
#[command(about = "Track leaflet delivery progress on the roads inside a hand-drawn boundary")]
#[command(long_about = "Builds a road network from a KML boundary and a regional OSM roads extract, records which roads have been delivered, and renders a colour-coded HTML map.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration JSON (défaut : env CANVASS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Répertoire des réseaux (prioritaire sur la configuration)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    debug!(data_dir = %config.data_dir.display(), "Configuration resolved");

    match cli.command {
        Commands::Init { network } => cli::cmd_init(&config, &network)?,
        Commands::Update { network, report } => {
            cli::cmd_update(&config, &network, report.as_deref())?
        }
        Commands::Import {
            network,
            file,
            report,
        } => cli::cmd_import(&config, &network, file.as_deref(), report.as_deref())?,
        Commands::Set {
            network,
            status,
            roads,
        } => cli::cmd_set(&config, &network, status, &roads)?,
        Commands::Rename { network, index, to } => cli::cmd_rename(&config, &network, index, &to)?,
        Commands::Reset { network } => cli::cmd_reset(&config, &network)?,
        Commands::Render { network, output } => {
            cli::cmd_render(&config, &network, output.as_deref())?
        }
        Commands::Summary { network, json } => {
            cli::cmd_summary(&config, &network, json.as_deref())?
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use arrsync_models::ShowIdStrategy;
use commands::{config, sync};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "arrsync")]
#[command(about = "arrsync - Send your Plex watchlist to Radarr and Sonarr")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a daily rotated file instead of stderr
    /// (without PATH: logs/arrsync.log next to the config file)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the watchlist into every configured environment
    #[command(long_about = "Fetch the Plex watchlist, resolve each title against TMDB and add it to Radarr (movies) or Sonarr (shows). Every configured environment is synced in turn unless --env narrows the selection.")]
    Sync {
        /// Only sync the named environment (repeatable)
        #[arg(long = "env", value_name = "NAME")]
        environments: Vec<String>,

        /// Resolve everything and report the requests that would be sent, without adding anything
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Override how show ids are obtained for every environment
        #[arg(long, value_enum, value_name = "STRATEGY")]
        show_id_strategy: Option<ShowIdStrategyArg>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    #[command(long_about = "Display the current configuration after environment overrides are applied. Tokens and API keys are masked unless --full is given.")]
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ShowIdStrategyArg {
    /// Use the TMDB id as the TVDB id
    Resolver,
    /// Ask Sonarr's series lookup for the TVDB id
    ServiceLookup,
}

impl From<ShowIdStrategyArg> for ShowIdStrategy {
    fn from(arg: ShowIdStrategyArg) -> Self {
        match arg {
            ShowIdStrategyArg::Resolver => ShowIdStrategy::Resolver,
            ShowIdStrategyArg::ServiceLookup => ShowIdStrategy::ServiceLookup,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Secrets may live in a .env next to the config or in the working directory
    let paths = config::resolve_paths(cli.config.as_deref())?;
    let _ = dotenvy::from_path(paths.env_file());
    let _ = dotenvy::dotenv();

    logging::init_logging_with_file(cli.verbose, cli.quiet, paths.log_target(cli.log_file.clone()))
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync {
            environments,
            dry_run,
            show_id_strategy,
        } => {
            let options = sync::SyncArgs {
                environments,
                dry_run,
                show_id_strategy: show_id_strategy.map(Into::into),
            };
            sync::run_sync(&paths, options, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, &paths, &output),
    }
}

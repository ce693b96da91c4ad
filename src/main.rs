use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use macroproxy::cli::fetch::FetchArgs;
use macroproxy::core::log::init_logging;
use macroproxy::providers::ProviderKind;
use std::net::SocketAddr;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the CORS proxy
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Fetch one indicator series through the proxy pipeline
    Fetch {
        #[arg(short, long, value_enum)]
        provider: ProviderKind,
        #[arg(short, long)]
        indicator: String,
        #[arg(long)]
        country: String,
        #[arg(short, long)]
        start: String,
        #[arg(short, long)]
        end: String,
        /// Print the normalized JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for macroproxy::AppCommand {
    fn from(cmd: Commands) -> macroproxy::AppCommand {
        match cmd {
            Commands::Serve { bind } => macroproxy::AppCommand::Serve { bind },
            Commands::Fetch {
                provider,
                indicator,
                country,
                start,
                end,
                json,
            } => macroproxy::AppCommand::Fetch(FetchArgs {
                provider,
                indicator,
                country,
                start_year: start,
                end_year: end,
                json,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => macroproxy::cli::setup::setup_at_path(path),
            None => macroproxy::cli::setup::setup(),
        },
        Some(cmd) => macroproxy::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

use crate::cli::fetch::FetchArgs;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::net::SocketAddr;
use tracing::{debug, info};

pub enum AppCommand {
    Serve { bind: Option<SocketAddr> },
    Fetch(FetchArgs),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("macroproxy starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Serve { bind } => server::serve(&config, bind).await,
        AppCommand::Fetch(args) => {
            let output = cli::fetch::fetch(&config, &args).await?;
            println!("{output}");
            Ok(())
        }
    }
}

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use serverpack_sync::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Point a launch script at the newest server pack of a CurseForge modpack
///
/// Reads the API key from CURSEFORGE_API_KEY
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON5 file to load settings from, flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    project_id: Option<u64>,
    /// Base URL of the CurseForge API
    #[arg(long)]
    api_base: Option<String>,
    /// How many recent files to look at (1-50)
    #[arg(long)]
    page_size: Option<u32>,
    /// The script holding SERVER_VERSION and SERVER_FILE_ID
    #[arg(short = 'f', long)]
    launch_file: Option<PathBuf>,
    /// `strict` or `pointer`
    #[arg(long)]
    policy: Option<SelectionPolicy>,
    /// Report what would change without writing the launch file
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, SyncError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(id) = self.project_id {
            config.project_id = id;
        }
        if let Some(base) = self.api_base {
            config.api_base = base;
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(path) = self.launch_file {
            config.launch_file = path;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config.dry_run = self.dry_run;

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<(), SyncError> {
    let config = cli.into_config()?;
    let api_key = api_key_from_env()?;
    debug!("{config:?}");

    let api = CurseForge::new(&config.api_base, api_key)?.with_page_size(config.page_size)?;
    let report = sync(&api, &config)?;

    let c = &report.candidate;
    println!(
        "Latest server files: {} (id {}, version {})",
        c.file_name, c.id, c.server_version
    );
    let launch = config.launch_file.display();
    match report.outcome {
        PatchOutcome::Unchanged => println!("No changes needed."),
        PatchOutcome::Updated => println!(
            "Updated {launch} -> SERVER_VERSION={}, SERVER_FILE_ID={}",
            c.server_version, c.id
        ),
        PatchOutcome::WouldUpdate => println!(
            "Would update {launch} -> SERVER_VERSION={}, SERVER_FILE_ID={}",
            c.server_version, c.id
        ),
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ghostwatch_cli::commands::{self, Shell};
use ghostwatch_cli::scenario::Scenario;
use ghostwatch_cli::{APP_NAME, load_config, readline, replay, store_config};
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Ghost totem detector")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a TOML scenario and print every report
    Replay {
        #[arg(short, long)]
        path: PathBuf,
    },
    /// Show the stored detector config
    Config {
        /// Write the effective config back to disk
        #[arg(long)]
        write: bool,
    },
    /// Interactive shell against a live detector (default)
    Shell {
        #[arg(short, long, default_value = "Steve")]
        name: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("GHOSTWATCH_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Replay { path }) => run_replay(&path),
        Some(Commands::Config { write }) => show_config(write),
        Some(Commands::Shell { name }) => run_shell(&name).await,
        None => run_shell("Steve").await,
    }
}

fn run_replay(path: &Path) -> Result<(), String> {
    let scenario = Scenario::load(path).map_err(|e| e.to_string())?;
    let config = scenario
        .detector_config(&load_config()?)
        .map_err(|e| e.to_string())?;

    let report = replay::run(&scenario, config);
    for line in &report.lines {
        println!("{}", line.render());
    }

    let d = &report.diagnostics;
    println!(
        "{} ticks, {} ghost verdicts, {} ordinary deaths, {} undelivered",
        report.ticks, d.ghost_verdicts, d.ordinary_deaths, d.failed_deliveries
    );
    Ok(())
}

fn show_config(write: bool) -> Result<(), String> {
    let config = load_config()?;
    let path = confy::get_configuration_file_path(APP_NAME, None).map_err(|e| e.to_string())?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config).map_err(|e| e.to_string())?);

    if write {
        store_config(&config)?;
        println!("# written");
    }
    Ok(())
}

async fn run_shell(name: &str) -> Result<(), String> {
    let shell = Arc::new(RwLock::new(Shell::new(load_config()?, name)));
    let ticker = commands::spawn_ticker(Arc::clone(&shell));

    loop {
        let raw = readline()?;
        if raw.is_empty() {
            break;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match commands::respond(line, Arc::clone(&shell)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ticker.abort();
    Ok(())
}

//! tilekit command line tool
//!
//! Run with: tilekit check assets/tilesets

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tilekit::{commands, Config, Error};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilekit")]
#[command(about = "Inspect, validate and autotile Tiled tilesets")]
struct Cli {
    /// Config file (defaults to ./tilekit.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate tilesets (files or directories)
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Find the tile for a wang id
    Resolve {
        tileset: PathBuf,
        /// Eight comma-separated colors, Top first, clockwise
        #[arg(short, long)]
        wangid: String,
        /// Wang set name (defaults to the configured or first set)
        #[arg(long)]
        wangset: Option<String>,
        /// Fail unless every position matches
        #[arg(long)]
        exact: bool,
        /// Pick among equally good tiles by probability using this seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print object hitboxes as JSON
    Hitboxes {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Scale factor (defaults to the configured one)
        #[arg(long)]
        scale: Option<f32>,
    },
    /// List neighbour layouts without an exact tile
    Coverage {
        tileset: PathBuf,
        #[arg(long)]
        wangset: Option<String>,
        #[arg(long, default_value = "1")]
        color: u8,
    },
    /// Autotile a text grid ('#' terrain, '.' empty) and print tile ids
    Fill {
        tileset: PathBuf,
        grid: PathBuf,
        #[arg(long)]
        wangset: Option<String>,
        #[arg(long, default_value = "1")]
        color: u8,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run a command; `Ok(false)` means it ran but found problems
fn run(cli: Cli) -> Result<bool, Error> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::discover(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Check { paths } => {
            let outcomes = commands::check(&paths, &config)?;
            for outcome in &outcomes {
                let name = outcome.path.display();
                if let Some(e) = &outcome.error {
                    println!("FAIL {}: {}", name, e);
                } else if outcome.issues.is_empty() {
                    println!("ok   {}", name);
                } else {
                    println!("FAIL {} ({} issues)", name, outcome.issues.len());
                    for issue in &outcome.issues {
                        println!("     - {}", issue);
                    }
                }
            }
            Ok(outcomes.iter().all(|o| o.is_ok()))
        }
        Command::Resolve {
            tileset,
            wangid,
            wangset,
            exact,
            seed,
        } => {
            let found =
                commands::resolve(&tileset, &wangid, wangset.as_deref(), exact, seed, &config)?;
            println!("{}", serde_json::to_string(&found)?);
            Ok(true)
        }
        Command::Hitboxes { paths, scale } => {
            let boxes = commands::hitboxes(&paths, config.scale(scale)?)?;
            println!("{}", serde_json::to_string_pretty(&boxes)?);
            Ok(true)
        }
        Command::Coverage {
            tileset,
            wangset,
            color,
        } => {
            let report = commands::coverage(&tileset, wangset.as_deref(), color, &config)?;
            println!(
                "{}: {}/{} layouts covered",
                report.wangset,
                report.covered(),
                report.required
            );
            for wang_id in &report.missing {
                println!("  missing {}", wang_id);
            }
            Ok(report.is_complete())
        }
        Command::Fill {
            tileset,
            grid,
            wangset,
            color,
        } => {
            let text = std::fs::read_to_string(&grid)
                .map_err(|e| Error::Grid(format!("{}: {}", grid.display(), e)))?;
            let result = commands::fill(&tileset, &text, wangset.as_deref(), color, &config)?;
            for row in result.tiles.chunks(result.width.max(1) as usize) {
                let line: Vec<String> = row
                    .iter()
                    .map(|t| t.map_or_else(|| "-".to_string(), |id| id.to_string()))
                    .collect();
                println!("{}", line.join(","));
            }
            for (x, y, wang_id) in &result.unmatched {
                println!("# no exact tile at ({}, {}) for {}", x, y, wang_id);
            }
            Ok(result.is_exact())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

mod report;
mod scenario;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use wayfind_paths::{MapCosts, TerrainCosts, WallCosts};

use crate::scenario::{CliError, OneBased};

/// Grid path finding and multi-stop route planning.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the cheapest path between two cells of one map.
    Path {
        /// Text map, one row per line.
        map: PathBuf,
        /// Start cell as ROW,COL (1-based).
        #[arg(long)]
        from: OneBased,
        /// Goal cell as ROW,COL (1-based).
        #[arg(long)]
        to: OneBased,
        /// Treat the map as a dungeon: walls are impassable, everything
        /// else costs the same.
        #[arg(long)]
        walled: bool,
        /// Wall symbol for --walled.
        #[arg(long, default_value_t = '#')]
        wall: char,
        /// Step cost for --walled.
        #[arg(long, default_value_t = 10)]
        step: i32,
    },
    /// Find the cheapest order in which to visit every dungeon of a scenario.
    Plan {
        /// JSON scenario file.
        scenario: PathBuf,
        /// Evaluate orders on every core.
        #[arg(long)]
        parallel: bool,
        /// Give up after this many milliseconds.
        #[arg(long, value_name = "MS")]
        time_limit_ms: Option<u64>,
        /// Print the cost of every evaluated order.
        #[arg(long)]
        candidates: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Path {
            map,
            from,
            to,
            walled,
            wall,
            step,
        } => {
            let grid = scenario::load_grid(&map)?;
            let costs: MapCosts = if walled {
                WallCosts::new(wall, step)?.into()
            } else {
                TerrainCosts::default().into()
            };
            let found = wayfind_paths::search(&grid, &costs, from.into(), to.into())
                .map_err(|source| CliError::Grid { path: map, source })?;
            let p = found.ok_or(CliError::NoPath { from, to })?;
            print!("{}", report::path(&p));
        }
        Command::Plan {
            scenario: file,
            parallel,
            time_limit_ms,
            candidates,
        } => {
            let planner = scenario::load_planner(&file)?;
            let mut config = planner.config();
            config.parallel |= parallel;
            if let Some(ms) = time_limit_ms {
                config.time_limit = Some(Duration::from_millis(ms));
            }
            let planner = planner.with_config(config);
            info!(
                "planning over {} groups from {}",
                planner.groups().len(),
                file.display()
            );

            let opt = planner.optimize()?;
            if candidates {
                print!("{}", report::candidates(&planner, &opt));
            }
            let legs = planner.report(&opt.best.order)?;
            print!("{}", report::itinerary(&planner, &opt, &legs));
        }
    }
    Ok(())
}

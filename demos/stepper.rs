//! Step through a search on a random map and print every frame.
//!
//! Run: cargo run --bin stepper -- [algorithm] [seed]

use std::error::Error;

use clap::Parser;
use sapf_demos::{LEGEND, demo_grid, paint};
use sapf_paths::{GeneticConfig, PathFinder, Registry, SearchConfig, SearchStatus};

#[derive(Parser, Debug)]
#[command(name = "stepper")]
#[command(about = "Step through a grid search and print every frame", long_about = None)]
struct Args {
    /// Registry key of the algorithm to run
    #[arg(default_value = "astar")]
    algorithm: String,

    /// Seeds both the map and the genetic search
    #[arg(default_value_t = 42)]
    seed: u64,
}

fn run(key: &str, seed: u64) -> Result<(), Box<dyn Error>> {
    let grid = demo_grid(seed)?;
    let registry = Registry::builtin_with_config(SearchConfig {
        genetic: GeneticConfig::default().with_seed(seed),
        ..SearchConfig::default()
    });
    let algo = registry.create(key)?;

    println!("{} on a {}x{} map (seed {seed})", algo.name(), grid.width(), grid.height());
    println!("{LEGEND}\n");

    let mut steps = algo.steps(&grid)?;
    let mut last = None;
    while let Some(step) = steps.next() {
        let step = step?;
        println!("-- step {} [{}]", steps.produced(), step.status);
        print!("{}", paint(&grid, &step));
        println!("{}\n", step.log);
        last = Some(step);
    }

    match last {
        Some(step) if step.status == SearchStatus::Found => {
            let len = step.best_path.map_or(0, |p| p.len());
            println!("FOUND: {len} cells after {} steps", steps.produced());
        }
        _ => println!("NO_PATH after {} steps", steps.produced()),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args.algorithm, args.seed) {
        eprintln!("Error: {e}");
        eprintln!("Available algorithms:");
        for spec in Registry::builtin().list() {
            eprintln!("  {:<12} {} ({})", spec.key, spec.display_name, spec.category);
        }
        std::process::exit(1);
    }
}

use std::path::PathBuf;

use clap::Parser;
use miette::*;

use aoc_runner::config::RunConfig;
use aoc_runner::runner::{Runner, Selection};
use aoc_runner::{logging, registry};

#[derive(Parser)]
#[command(name = "aoc", version, about = "Runs registered Advent of Code puzzles")]
struct Cli {
    /// Directory holding the puzzle input files. Searched for upwards when omitted.
    #[arg(long, env = "AOC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// `all`, a list of days such as `3,7`, or empty for the latest day.
    #[arg(long, default_value = "")]
    run: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let cwd = std::env::current_dir().into_diagnostic()?;
    let config = RunConfig::resolve(cli.data_dir, &cwd)?;
    let selection = cli.run.parse::<Selection>().into_diagnostic()?;

    let runner = Runner::new(&config, registry::puzzles()?);
    let reports = runner.run(&selection);
    if reports.iter().any(|r| !r.succeeded) {
        bail!("one or more puzzles failed");
    }
    Ok(())
}

use miette::*;

use aoc2025_day_7::part2;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/input2.txt");
    let input = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {path}"))?;
    let result = part2::process(&input)?;
    println!("Result: {}", result);
    Ok(())
}

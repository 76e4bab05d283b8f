//! The worked example from the puzzle statement, plus the self-checks the
//! runner executes before touching the real input.

use miette::*;
use tracing::info;

use crate::grid::BeamGrid;

pub const EXAMPLE_ROWS: [&str; 16] = [
    ".......S.......",
    "...............",
    ".......^.......",
    "...............",
    "......^.^......",
    "...............",
    ".....^.^.^.....",
    "...............",
    "....^.^...^....",
    "...............",
    "...^.^...^.^...",
    "...............",
    "..^...^.....^..",
    "...............",
    ".^.^.^.^.^...^.",
    "...............",
];

/// The example grid after the beam has run to the bottom row.
pub const EXAMPLE_PROPAGATED: [&str; 16] = [
    ".......S.......",
    ".......|.......",
    "......|^|......",
    "......|.|......",
    ".....|^|^|.....",
    ".....|.|.|.....",
    "....|^|^|^|....",
    "....|.|.|.|....",
    "...|^|^|||^|...",
    "...|.|.|||.|...",
    "..|^|^|||^|^|..",
    "..|.|.|||.|.|..",
    ".|^|||^||.||^|.",
    ".|.|||.||.||.|.",
    "|^|^|^|^|^|||^|",
    "|.|.|.|.|.|||.|",
];

pub const EXAMPLE_SPLITS: usize = 21;
pub const EXAMPLE_TIMELINES: u64 = 40;

fn compare_rows(stage: &str, actual: &[String], expected: &[&str]) -> Result<()> {
    ensure!(
        actual.len() == expected.len(),
        "{stage}: rendered {} rows, expected {}",
        actual.len(),
        expected.len()
    );
    for (row, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        ensure!(
            actual == expected,
            "{stage}: row {row} differs\nactual   = '{actual}'\nexpected = '{expected}'"
        );
    }
    Ok(())
}

/// Loads the example, checks the round trip, then checks the propagated
/// pattern and the split count.
#[tracing::instrument]
pub fn check_part_one() -> Result<()> {
    let mut grid = BeamGrid::from_rows(&EXAMPLE_ROWS)?;
    info!("loaded grid:\n{grid}");
    compare_rows("initial grid", &grid.render_rows(), &EXAMPLE_ROWS)?;

    let splits = grid.split_beam_count()?;
    compare_rows("propagated grid", &grid.render_rows(), &EXAMPLE_PROPAGATED)?;
    ensure!(
        splits == EXAMPLE_SPLITS,
        "example split {splits} beams, expected {EXAMPLE_SPLITS}"
    );
    Ok(())
}

#[tracing::instrument]
pub fn check_part_two() -> Result<()> {
    let mut grid = BeamGrid::from_rows(&EXAMPLE_ROWS)?;
    let timelines = grid.timeline_count()?;
    ensure!(
        timelines == EXAMPLE_TIMELINES,
        "example produced {timelines} timelines, expected {EXAMPLE_TIMELINES}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_checks_pass() -> Result<()> {
        check_part_one()?;
        check_part_two()?;
        Ok(())
    }

    #[test]
    fn mismatched_rows_are_reported() {
        let actual = vec!["...".to_string(), ".|.".to_string()];
        let err = compare_rows("demo", &actual, &["...", "..."]).unwrap_err();
        assert!(err.to_string().contains("row 1 differs"));

        let err = compare_rows("demo", &actual, &["..."]).unwrap_err();
        assert!(err.to_string().contains("rendered 2 rows, expected 1"));
    }
}

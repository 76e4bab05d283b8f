use miette::*;

use crate::grid::BeamGrid;
use crate::parser::parse_rows;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let rows = parse_rows(input)?;
    // Timelines double at every splitter, so the count can run into the trillions.
    let mut grid = BeamGrid::from_rows(&rows)?;
    let timelines = grid.timeline_count()?;
    Ok(timelines.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() -> Result<()> {
        let input = ".......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............";
        assert_eq!("40", process(input)?);
        Ok(())
    }

    #[test]
    fn missing_start_is_reported() {
        let err = process("...\n.^.\n...").unwrap_err();
        assert!(err.to_string().contains("no start position"));
    }
}

use miette::*;

use crate::grid::BeamGrid;
use crate::parser::parse_rows;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let rows = parse_rows(input)?;
    let mut grid = BeamGrid::from_rows(&rows)?;
    let splits = grid.split_beam_count()?;
    Ok(splits.to_string())
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
        assert_eq!("21", process(input)?);
        Ok(())
    }

    #[test]
    fn ragged_input_is_rejected() {
        let err = process("..S..\n...\n").unwrap_err();
        assert!(err.to_string().contains("row 1 is 3 characters wide"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(process("").is_err());
    }
}

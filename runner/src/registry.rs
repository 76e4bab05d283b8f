use miette::Result;

use crate::puzzle::Puzzle;

/// Every puzzle the runner can execute, in ascending day order.
pub fn puzzles() -> Result<Vec<Puzzle>> {
    use aoc2025_day_7::{example, part1, part2};

    let mut puzzles = vec![Puzzle::new(7, "Laboratories", "day07-input.txt")?
        .part_one(part1::process)
        .part_two(part2::process)
        .part_one_test(example::check_part_one)
        .part_two_test(example::check_part_two)];
    puzzles.sort_by_key(|p| p.day);
    Ok(puzzles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laboratories_is_registered() -> Result<()> {
        let puzzles = puzzles()?;
        let day7 = puzzles.iter().find(|p| p.day == 7).unwrap();
        assert!(day7.part_one.is_some() && day7.part_two.is_some());
        if let Some(test) = day7.part_one_test {
            test()?;
        }
        if let Some(test) = day7.part_two_test {
            test()?;
        }
        assert!(puzzles.windows(2).all(|w| w[0].day < w[1].day));
        Ok(())
    }
}

use std::convert::Infallible;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::input::PuzzleInput;
use crate::puzzle::{Puzzle, SelfTest, Solver};

/// Which registered puzzles to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The puzzle with the highest day number.
    Latest,
    All,
    Days(Vec<u8>),
}

impl FromStr for Selection {
    type Err = Infallible;

    /// Blank selects the latest day, `all` selects everything, anything else is
    /// read as a comma or space separated list of days. Entries that are not
    /// day numbers are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Selection::Latest);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        let mut days: Vec<u8> = s
            .split([',', ' '])
            .filter(|part| !part.is_empty())
            .filter_map(|part| part.parse().ok())
            .collect();
        days.sort_unstable();
        days.dedup();
        Ok(Selection::Days(days))
    }
}

/// Result of running one part of a puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartOutcome {
    /// The answer, or the error message when the part failed.
    pub result: String,
    pub elapsed: Option<Duration>,
    pub passed: bool,
}

impl PartOutcome {
    fn missing(passed: bool) -> Self {
        Self {
            result: String::new(),
            elapsed: None,
            passed,
        }
    }
}

impl std::fmt::Display for PartOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.elapsed {
            Some(elapsed) => write!(f, "{} ({:.3?})", self.result, elapsed),
            None => write!(f, "{}", self.result),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleReport {
    pub day: u8,
    pub part_one: PartOutcome,
    pub part_two: PartOutcome,
    pub succeeded: bool,
}

const SEPARATOR: &str = "=====     ------------------------------------------------------------     =====";

pub struct Runner<'a> {
    config: &'a RunConfig,
    puzzles: Vec<Puzzle>,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a RunConfig, mut puzzles: Vec<Puzzle>) -> Self {
        puzzles.sort_by_key(|p| p.day);
        Self { config, puzzles }
    }

    pub fn select(&self, selection: &Selection) -> Vec<&Puzzle> {
        match selection {
            Selection::Latest => self.puzzles.last().into_iter().collect(),
            Selection::All => self.puzzles.iter().collect(),
            Selection::Days(days) => self
                .puzzles
                .iter()
                .filter(|p| days.contains(&p.day))
                .collect(),
        }
    }

    pub fn run(&self, selection: &Selection) -> Vec<PuzzleReport> {
        if self.puzzles.is_empty() {
            error!("No challenges to run!");
            return Vec::new();
        }

        let selected = self.select(selection);
        if selected.is_empty() {
            warn!(?selection, "no registered puzzle matches the selection");
        }
        selected.into_iter().map(|p| self.run_puzzle(p)).collect()
    }

    #[tracing::instrument(skip_all, fields(day = puzzle.day))]
    fn run_puzzle(&self, puzzle: &Puzzle) -> PuzzleReport {
        info!("Running challenge for {}", puzzle.label());

        let report = match self.prepare(puzzle) {
            Ok(input) => {
                let part_one = match puzzle.part_one {
                    Some(solver) => run_part(solver, input.text()),
                    None => {
                        info!("No runner found for part one");
                        PartOutcome::missing(false)
                    }
                };
                let part_two = match puzzle.part_two {
                    Some(solver) => run_part(solver, input.text()),
                    None => {
                        info!("No runner found for part two");
                        PartOutcome::missing(true)
                    }
                };
                PuzzleReport {
                    day: puzzle.day,
                    succeeded: part_one.passed && part_two.passed,
                    part_one,
                    part_two,
                }
            }
            Err(err) => {
                error!("{err:?}");
                PuzzleReport {
                    day: puzzle.day,
                    part_one: PartOutcome::missing(false),
                    part_two: PartOutcome::missing(false),
                    succeeded: false,
                }
            }
        };

        let status = if report.succeeded { "" } else { "un" };
        info!("Challenge completed {status}successfully");
        info!("Part One solution: {}", report.part_one);
        info!("Part Two solution: {}", report.part_two);
        info!("{SEPARATOR}");
        report
    }

    /// Runs the self-tests, then reads the input file.
    fn prepare(&self, puzzle: &Puzzle) -> miette::Result<PuzzleInput> {
        run_self_test("Part One", puzzle.part_one_test)?;
        run_self_test("Part Two", puzzle.part_two_test)?;
        Ok(PuzzleInput::load(self.config, puzzle.input_file)?)
    }
}

fn run_self_test(part: &str, test: Option<SelfTest>) -> miette::Result<()> {
    let Some(test) = test else {
        return Ok(());
    };
    info!("Executing tests for {part}");
    let started = Instant::now();
    test()?;
    info!("{part} tests completed ({:.3?})", started.elapsed());
    Ok(())
}

fn run_part(solver: Solver, input: &str) -> PartOutcome {
    let started = Instant::now();
    let outcome = solver(input);
    let elapsed = Some(started.elapsed());
    match outcome {
        Ok(result) => PartOutcome {
            result,
            elapsed,
            passed: true,
        },
        Err(err) => PartOutcome {
            result: err.to_string(),
            elapsed,
            passed: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use miette::miette;
    use rstest::rstest;

    fn echo_lines(input: &str) -> miette::Result<String> {
        Ok(input.lines().count().to_string())
    }

    fn always_fails(_: &str) -> miette::Result<String> {
        Err(miette!("boom"))
    }

    fn passing_test() -> miette::Result<()> {
        Ok(())
    }

    fn failing_test() -> miette::Result<()> {
        Err(miette!("example mismatch"))
    }

    fn puzzle(day: u8) -> Puzzle {
        Puzzle::new(day, "", "input.txt").unwrap().part_one(echo_lines)
    }

    fn data_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("input.txt"), "a\nb\nc\n").unwrap();
        tmp
    }

    #[rstest]
    #[case("", Selection::Latest)]
    #[case("   ", Selection::Latest)]
    #[case("all", Selection::All)]
    #[case("ALL", Selection::All)]
    #[case("7", Selection::Days(vec![7]))]
    #[case("9, 3 7", Selection::Days(vec![3, 7, 9]))]
    #[case("3,x,3,-1", Selection::Days(vec![3]))]
    fn parses_selection(#[case] raw: &str, #[case] expected: Selection) {
        assert_eq!(raw.parse::<Selection>().unwrap(), expected);
    }

    #[test]
    fn selects_latest_all_or_listed_days() {
        let config = RunConfig::new(".");
        let runner = Runner::new(&config, vec![puzzle(9), puzzle(2), puzzle(5)]);
        let days = |s: Selection| runner.select(&s).iter().map(|p| p.day).collect::<Vec<_>>();

        assert_eq!(days(Selection::Latest), [9]);
        assert_eq!(days(Selection::All), [2, 5, 9]);
        assert_eq!(days(Selection::Days(vec![5, 6])), [5]);
    }

    #[test]
    fn empty_registry_runs_nothing() {
        let config = RunConfig::new(".");
        let runner = Runner::new(&config, Vec::new());
        assert!(runner.run(&Selection::All).is_empty());
    }

    #[test]
    fn runs_both_parts_against_the_input() {
        let tmp = data_dir();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(
            &config,
            vec![puzzle(1).part_two(echo_lines).part_one_test(passing_test)],
        );

        let reports = runner.run(&Selection::Latest);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert!(report.succeeded);
        assert_eq!(report.part_one.result, "3");
        assert_eq!(report.part_two.result, "3");
        assert!(report.part_one.elapsed.is_some());
    }

    #[test]
    fn missing_part_two_still_passes() {
        let tmp = data_dir();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, vec![puzzle(1)]);

        let report = &runner.run(&Selection::All)[0];
        assert!(report.succeeded);
        assert!(report.part_two.passed);
        assert_eq!(report.part_two.elapsed, None);
    }

    #[test]
    fn missing_part_one_fails() {
        let tmp = data_dir();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, vec![Puzzle::new(1, "", "input.txt").unwrap()]);

        let report = &runner.run(&Selection::All)[0];
        assert!(!report.succeeded);
        assert!(!report.part_one.passed);
    }

    #[test]
    fn failing_part_records_its_error_and_the_run_continues() {
        let tmp = data_dir();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, vec![puzzle(1).part_two(always_fails), puzzle(2)]);

        let reports = runner.run(&Selection::All);
        assert_eq!(reports.len(), 2);
        assert!(!reports[0].succeeded);
        assert!(reports[0].part_one.passed);
        assert_eq!(reports[0].part_two.result, "boom");
        assert!(reports[1].succeeded);
    }

    #[test]
    fn failing_self_test_skips_the_puzzle() {
        let tmp = data_dir();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, vec![puzzle(1).part_two_test(failing_test)]);

        let report = &runner.run(&Selection::All)[0];
        assert!(!report.succeeded);
        assert_eq!(report.part_one.result, "");
    }

    #[test]
    fn unreadable_input_fails_the_puzzle() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, vec![puzzle(4)]);

        let report = &runner.run(&Selection::Days(vec![4]))[0];
        assert!(!report.succeeded);
    }

    #[test]
    fn runs_registered_laboratories_puzzle() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("day07-input.txt"),
            aoc2025_day_7::example::EXAMPLE_ROWS.join("\n"),
        )
        .unwrap();
        let config = RunConfig::new(tmp.path());
        let runner = Runner::new(&config, crate::registry::puzzles().unwrap());

        let report = &runner.run(&Selection::Days(vec![7]))[0];
        assert!(report.succeeded);
        assert_eq!(report.part_one.result, "21");
        assert_eq!(report.part_two.result, "40");
    }
}

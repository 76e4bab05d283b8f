use miette::Diagnostic;
use thiserror::Error;

/// Solves one part of a puzzle from the raw input text.
pub type Solver = fn(&str) -> miette::Result<String>;

/// Checks a part against the worked example before the real input is read.
pub type SelfTest = fn() -> miette::Result<()>;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("day {0} is outside 1..=25")]
    #[diagnostic(code(runner::invalid_day))]
    InvalidDay(u8),

    #[error("day {0} has no input file name")]
    #[diagnostic(code(runner::missing_input_file))]
    MissingInputFile(u8),
}

/// Everything the runner knows about one day: which operations exist is
/// declared here when the puzzle is registered.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub day: u8,
    pub title: &'static str,
    pub input_file: &'static str,
    pub part_one: Option<Solver>,
    pub part_two: Option<Solver>,
    pub part_one_test: Option<SelfTest>,
    pub part_two_test: Option<SelfTest>,
}

impl Puzzle {
    pub fn new(day: u8, title: &'static str, input_file: &'static str) -> Result<Self, PuzzleError> {
        if !(1..=25).contains(&day) {
            return Err(PuzzleError::InvalidDay(day));
        }
        if input_file.trim().is_empty() {
            return Err(PuzzleError::MissingInputFile(day));
        }
        Ok(Self {
            day,
            title,
            input_file,
            part_one: None,
            part_two: None,
            part_one_test: None,
            part_two_test: None,
        })
    }

    pub fn part_one(mut self, solver: Solver) -> Self {
        self.part_one = Some(solver);
        self
    }

    pub fn part_two(mut self, solver: Solver) -> Self {
        self.part_two = Some(solver);
        self
    }

    pub fn part_one_test(mut self, test: SelfTest) -> Self {
        self.part_one_test = Some(test);
        self
    }

    pub fn part_two_test(mut self, test: SelfTest) -> Self {
        self.part_two_test = Some(test);
        self
    }

    /// `Day 7: Laboratories`, or just `Day 7` when untitled.
    pub fn label(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Day {}", self.day)
        } else {
            format!("Day {}: {}", self.day, self.title)
        }
    }
}

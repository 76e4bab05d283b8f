use std::collections::{HashMap, VecDeque};
use std::fmt;

use glam::{IVec2, UVec2};
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, trace};

/// Largest width or height a grid may be constructed with.
pub const MAX_DIMENSION: usize = 1000;

const UP: IVec2 = IVec2::NEG_Y;
const DOWN: IVec2 = IVec2::Y;
const LEFT: IVec2 = IVec2::NEG_X;
const RIGHT: IVec2 = IVec2::X;

/// Maps a cell state to the character used when rendering the grid.
pub type CellRenderer = fn(CellState) -> char;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions {width}x{height} must be within 1..={}", MAX_DIMENSION)]
    #[diagnostic(code(beam_grid::invalid_dimensions))]
    InvalidDimensions { width: usize, height: usize },

    #[error("expected {expected} rows but the input has {actual}")]
    #[diagnostic(code(beam_grid::row_count))]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("row {row} is {actual} characters wide, expected {expected}")]
    #[diagnostic(code(beam_grid::row_length))]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    #[diagnostic(
        code(beam_grid::out_of_bounds),
        help("splitters must not sit on the outermost columns")
    )]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("coordinate ({x}, {y}) must be non-negative and at most {}", MAX_DIMENSION)]
    #[diagnostic(code(beam_grid::invalid_coordinate))]
    InvalidCoordinate { x: i64, y: i64 },

    #[error("no start position 'S' found in grid")]
    #[diagnostic(code(beam_grid::missing_start))]
    MissingStart,

    #[error("found {count} start positions, expected exactly one")]
    #[diagnostic(code(beam_grid::multiple_starts))]
    MultipleStarts { count: usize },

    #[error("timeline count below ({x}, {y}) does not fit in 64 bits")]
    #[diagnostic(code(beam_grid::timeline_overflow))]
    TimelineOverflow { x: usize, y: usize },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Start,
    Empty,
    Splitter,
    Beam,
    #[default]
    Unknown,
}

impl CellState {
    /// Inverse of the load table; anything unrecognised renders as `?`.
    pub fn symbol(self) -> char {
        match self {
            CellState::Start => 'S',
            CellState::Empty => '.',
            CellState::Splitter => '^',
            CellState::Beam => '|',
            CellState::Unknown => '?',
        }
    }
}

impl From<char> for CellState {
    fn from(c: char) -> Self {
        match c {
            'S' => CellState::Start,
            '.' => CellState::Empty,
            '^' => CellState::Splitter,
            '|' => CellState::Beam,
            _ => CellState::Unknown,
        }
    }
}

/// Position of a cell inside a grid. Both components lie in `0..=MAX_DIMENSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate(UVec2);

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Result<Self, GridError> {
        if x > MAX_DIMENSION || y > MAX_DIMENSION {
            return Err(GridError::InvalidCoordinate {
                x: x as i64,
                y: y as i64,
            });
        }
        Ok(Self(UVec2::new(x as u32, y as u32)))
    }

    pub fn x(self) -> usize {
        self.0.x as usize
    }

    pub fn y(self) -> usize {
        self.0.y as usize
    }

    pub fn as_ivec2(self) -> IVec2 {
        self.0.as_ivec2()
    }
}

impl TryFrom<IVec2> for Coordinate {
    type Error = GridError;

    fn try_from(pos: IVec2) -> Result<Self, Self::Error> {
        let invalid = || GridError::InvalidCoordinate {
            x: pos.x as i64,
            y: pos.y as i64,
        };
        let x = usize::try_from(pos.x).map_err(|_| invalid())?;
        let y = usize::try_from(pos.y).map_err(|_| invalid())?;
        Coordinate::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    location: Coordinate,
    state: CellState,
}

impl Cell {
    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn state(&self) -> CellState {
        self.state
    }
}

/// Bookkeeping from a single propagation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Propagation {
    /// Cells pushed onto the worklist, including the start cell.
    pub enqueued: usize,
    /// Cells popped from the worklist.
    pub processed: usize,
}

enum Descent {
    Resolved(u64),
    Split(Coordinate),
}

struct SplitFrame {
    at: Coordinate,
    left: Option<u64>,
}

/// A tachyon manifold: a start cell, splitters and empty space.
///
/// Cells are stored row-major in a single vector. All access goes through
/// bounds-checked lookups that report [`GridError::OutOfBounds`].
///
/// Propagation mutates cells in place, so a grid supports one simulation run.
/// Build a fresh grid for every run.
#[derive(Debug, Clone)]
pub struct BeamGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    renderer: Option<CellRenderer>,
    timeline_memo: HashMap<Coordinate, u64>,
}

impl BeamGrid {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let cells = (0..height)
            .cartesian_product(0..width)
            .map(|(y, x)| Cell {
                location: Coordinate(UVec2::new(x as u32, y as u32)),
                state: CellState::Unknown,
            })
            .collect();

        Ok(Self {
            width,
            height,
            cells,
            renderer: None,
            timeline_memo: HashMap::new(),
        })
    }

    pub fn with_renderer(
        width: usize,
        height: usize,
        renderer: CellRenderer,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height)?;
        grid.renderer = Some(renderer);
        Ok(grid)
    }

    /// Sizes a grid from the first row and the row count, then loads it.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::new(width, rows.len())?;
        grid.load(rows)?;
        Ok(grid)
    }

    /// Populates every cell from `rows`.
    ///
    /// The whole input is validated before any cell is written, so a rejected
    /// load leaves the grid as it was.
    pub fn load<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), GridError> {
        if rows.len() != self.height {
            return Err(GridError::RowCountMismatch {
                expected: self.height,
                actual: rows.len(),
            });
        }
        for (row, line) in rows.iter().enumerate() {
            let actual = line.as_ref().chars().count();
            if actual != self.width {
                return Err(GridError::RowLengthMismatch {
                    row,
                    expected: self.width,
                    actual,
                });
            }
        }

        for (cells, line) in self.cells.chunks_mut(self.width).zip(rows) {
            for (cell, c) in cells.iter_mut().zip(line.as_ref().chars()) {
                cell.state = CellState::from(c);
            }
        }
        self.timeline_memo.clear();

        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index_of(&self, pos: IVec2) -> Result<usize, GridError> {
        let out_of_bounds = || GridError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        };
        let x = usize::try_from(pos.x).map_err(|_| out_of_bounds())?;
        let y = usize::try_from(pos.y).map_err(|_| out_of_bounds())?;
        if x >= self.width || y >= self.height {
            return Err(out_of_bounds());
        }
        Ok(y * self.width + x)
    }

    pub fn get(&self, pos: IVec2) -> Result<&Cell, GridError> {
        let idx = self.index_of(pos)?;
        Ok(&self.cells[idx])
    }

    pub fn set(&mut self, pos: IVec2, state: CellState) -> Result<(), GridError> {
        let idx = self.index_of(pos)?;
        self.cells[idx].state = state;
        Ok(())
    }

    fn state_at(&self, pos: IVec2) -> Result<CellState, GridError> {
        Ok(self.get(pos)?.state)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn splitters(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.state == CellState::Splitter)
    }

    /// Locates the single start cell.
    pub fn start(&self) -> Result<Coordinate, GridError> {
        let mut starts = self.cells.iter().filter(|c| c.state == CellState::Start);
        let first = starts.next().ok_or(GridError::MissingStart)?;
        let extra = starts.count();
        if extra > 0 {
            return Err(GridError::MultipleStarts { count: extra + 1 });
        }
        Ok(first.location)
    }

    fn is_last_row(&self, y: usize) -> bool {
        y + 1 == self.height
    }

    /// Drops a beam from the start cell and lets it fall to the bottom row.
    ///
    /// Every cell enters the worklist at most once; beams already present in
    /// the input are overwritten and followed like empty space. A splitter on
    /// the outermost column is malformed input and surfaces as
    /// [`GridError::OutOfBounds`].
    pub fn propagate(&mut self) -> Result<Propagation, GridError> {
        let start = self.start()?.as_ivec2();
        let mut queued = vec![false; self.cells.len()];
        queued[self.index_of(start)?] = true;
        let mut queue = VecDeque::from([start]);
        let mut report = Propagation {
            enqueued: 1,
            processed: 0,
        };

        while let Some(pos) = queue.pop_front() {
            report.processed += 1;
            if self.is_last_row(pos.y as usize) {
                continue;
            }

            let below = pos + DOWN;
            let targets = match self.state_at(below)? {
                CellState::Splitter => vec![below + LEFT, below + RIGHT],
                _ => vec![below],
            };
            for target in targets {
                let idx = self.index_of(target)?;
                // A splitter is never overwritten; a beam flanking into one is absorbed.
                if queued[idx] || self.cells[idx].state == CellState::Splitter {
                    continue;
                }
                queued[idx] = true;
                self.cells[idx].state = CellState::Beam;
                queue.push_back(target);
                report.enqueued += 1;
            }
        }

        debug!(
            enqueued = report.enqueued,
            processed = report.processed,
            "beam propagation finished"
        );
        Ok(report)
    }

    /// True when `cell` is a splitter with a beam entering from above and
    /// leaving on both sides.
    pub fn has_split(&self, cell: &Cell) -> Result<bool, GridError> {
        if cell.state != CellState::Splitter || cell.location.y() == 0 {
            return Ok(false);
        }
        let pos = cell.location.as_ivec2();
        let split = self.state_at(pos + UP)? == CellState::Beam
            && self.state_at(pos + LEFT)? == CellState::Beam
            && self.state_at(pos + RIGHT)? == CellState::Beam;
        trace!(x = pos.x, y = pos.y, split, "checked splitter");
        Ok(split)
    }

    /// Runs the beam and counts the splitters that actually split it.
    #[tracing::instrument(skip(self))]
    pub fn split_beam_count(&mut self) -> Result<usize, GridError> {
        self.propagate()?;
        let mut count = 0;
        for cell in self.splitters() {
            if self.has_split(cell)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Runs the beam and counts every distinct path from the start cell to
    /// the bottom row.
    #[tracing::instrument(skip(self))]
    pub fn timeline_count(&mut self) -> Result<u64, GridError> {
        self.propagate()?;
        let start = self.start()?;
        self.timelines_from(start)
    }

    /// Walks down from `pos` until the count is known or a splitter is hit.
    /// A splitter flanking another splitter absorbs the beam, so a flank that
    /// is itself a splitter resolves to zero.
    fn descend(&self, mut pos: IVec2, flank: bool) -> Result<Descent, GridError> {
        if flank && self.state_at(pos)? == CellState::Splitter {
            return Ok(Descent::Resolved(0));
        }
        loop {
            let cell = self.get(pos)?;
            if let Some(&count) = self.timeline_memo.get(&cell.location) {
                return Ok(Descent::Resolved(count));
            }
            match cell.state {
                CellState::Splitter => return Ok(Descent::Split(cell.location)),
                state if self.is_last_row(cell.location.y()) => {
                    return Ok(Descent::Resolved(u64::from(state == CellState::Beam)));
                }
                _ => pos += DOWN,
            }
        }
    }

    /// Number of timelines reachable downward from `origin`.
    ///
    /// Splitter results are memoized by coordinate. Pending splitters live on
    /// an explicit stack, so tall grids cannot exhaust the call stack.
    pub fn timelines_from(&mut self, origin: Coordinate) -> Result<u64, GridError> {
        let mut stack: Vec<SplitFrame> = Vec::new();
        let mut next = self.descend(origin.as_ivec2(), false)?;

        loop {
            let mut count = match next {
                Descent::Split(at) => {
                    stack.push(SplitFrame { at, left: None });
                    next = self.descend(at.as_ivec2() + LEFT, true)?;
                    continue;
                }
                Descent::Resolved(count) => count,
            };

            // Fold the resolved count into the pending splitters.
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(count);
                };
                match frame.left {
                    None => {
                        frame.left = Some(count);
                        let at = frame.at;
                        next = self.descend(at.as_ivec2() + RIGHT, true)?;
                        break;
                    }
                    Some(left) => {
                        let at = frame.at;
                        count = left.checked_add(count).ok_or(GridError::TimelineOverflow {
                            x: at.x(),
                            y: at.y(),
                        })?;
                        self.timeline_memo.insert(at, count);
                        stack.pop();
                    }
                }
            }
        }
    }

    /// Memo-free timeline count used as a reference for [`Self::timelines_from`].
    /// Exponential in the number of splitters, so keep it to small grids.
    #[cfg(test)]
    pub(crate) fn brute_force_timelines_from(&self, origin: Coordinate) -> Result<u64, GridError> {
        let mut total: u64 = 0;
        let mut pending = vec![origin.as_ivec2()];

        while let Some(mut pos) = pending.pop() {
            loop {
                let cell = self.get(pos)?;
                if cell.state == CellState::Splitter {
                    for side in [LEFT, RIGHT] {
                        let flank = pos + side;
                        if self.state_at(flank)? != CellState::Splitter {
                            pending.push(flank);
                        }
                    }
                    break;
                }
                if self.is_last_row(cell.location.y()) {
                    if cell.state == CellState::Beam {
                        total = total.checked_add(1).ok_or(GridError::TimelineOverflow {
                            x: cell.location.x(),
                            y: cell.location.y(),
                        })?;
                    }
                    break;
                }
                pos += DOWN;
            }
        }

        Ok(total)
    }

    /// Renders each row with the installed renderer, or [`CellState::symbol`].
    pub fn render_rows(&self) -> Vec<String> {
        let render = self.renderer.unwrap_or(CellState::symbol);
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| render(c.state)).collect())
            .collect()
    }
}

impl fmt::Display for BeamGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_rows().iter().join("\n"))
    }
}

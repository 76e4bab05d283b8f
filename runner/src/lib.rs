//! Harness that runs registered daily puzzles against their input files.

pub mod config;
pub mod input;
pub mod logging;
pub mod puzzle;
pub mod registry;
pub mod runner;

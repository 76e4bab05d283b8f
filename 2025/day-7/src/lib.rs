pub mod example;
pub mod grid;
pub mod parser;
pub mod part1;
pub mod part2;

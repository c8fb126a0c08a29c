//! Terminal presentation for the CLI

pub mod context;
pub mod diff;
pub mod prompt;
pub mod terminal;
pub mod theme;
pub mod views;

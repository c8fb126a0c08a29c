//! Command output views

pub mod config;
pub mod run;
pub mod table;
pub mod units;

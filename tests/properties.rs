//! Property tests for fleet-deploy.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics", "status only moves along
//! lifecycle edges" and "resolution is idempotent".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/unit_lifecycle.rs"]
mod unit_lifecycle;

#[path = "properties/config_resolution.rs"]
mod config_resolution;

#[path = "properties/input_parsing.rs"]
mod input_parsing;

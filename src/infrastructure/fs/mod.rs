//! File System Helpers
//!
//! Atomic writes and `.env` parsing shared by the file-backed adapters.

mod atomic;
mod dotenv;

pub use atomic::atomic_write;
pub use dotenv::{parse_env, read_env_file, render_env};

//! Tractus CLI library.
//!
//! This crate provides the command-line interface around `tractus-core`.

mod cli;
mod config;
pub mod plan;

pub use cli::Cli;
pub use config::Config;

//! Command-line host for lvlua scripts

pub mod config;
pub mod logging;
pub mod runner;

pub use config::LvluaConfig;
pub use runner::{run_script, symbols, RunOptions, ScriptRunner};

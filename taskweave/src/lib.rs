//! Library entry for the `taskweave` CLI crate.
//!
//! All orchestration logic lives in [`taskweave_core`]; this crate is
//! strictly CLI glue: argument parsing, YAML configuration loading and the
//! collaborator adapters (plan engine, filesystem cleaner, validator).

pub mod cli;
pub mod engine;
pub mod load_config;

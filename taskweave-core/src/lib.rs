//! taskweave-core: task-graph construction for file pipelines.
//!
//! This crate contains all orchestration logic for taskweave: configuration
//! normalisation, plugin-list resolution, path resolution and the task
//! factories that register clean/build/watch tasks with an external
//! execution engine.
//!
//! The execution engine, the concrete file transforms and the schema
//! validation mechanism are external collaborators, consumed through the
//! traits in [`contract`]. Graph construction itself is synchronous and
//! produces pure task descriptions; nothing executes until the engine runs
//! a registered task.
//!
//! # Usage
//! Build a [`factory::CompositeTaskFactory`] for a configured task group,
//! call `construct` with a [`factory::FactoryContext`], then ask the engine
//! to run the returned umbrella task.

pub mod build;
pub mod config;
pub mod contract;
pub mod deploy;
pub mod error;
pub mod factory;
pub mod path;
pub mod plugin;
pub mod task;
pub mod vendor;

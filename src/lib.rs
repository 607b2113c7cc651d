//! Core library for the `atest` CLI.
//!
//! `atest` runs declarative API test suites: YAML files listing HTTP requests
//! and their expected responses. The crate provides the suite model and
//! loader, template rendering, the HTTP case runner, the execution engine
//! that bounds concurrency, rate and duration, and the report writers. The
//! primary user-facing interface is the `atest` command-line application;
//! library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod engine;
mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod report;
pub mod runner;
pub mod shutdown;
mod shutdown_handlers;
pub mod suite;

pub use entry::{execute_run, result_writer, run, run_suites};

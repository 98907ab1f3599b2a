#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the Conveyor CI service.
//!
//! Layout:
//! - `cli.rs`: argument parsing, config-file defaults, and command dispatch
//! - `config.rs`: optional YAML config file
//! - `action/`: per-resource configurations (validate, call, render)
//! - `client.rs`: `CiClient` abstraction, reqwest implementation, and errors
//! - `output/`: format selection, tables, and humanized times
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod action;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod config;
pub(crate) mod output;
#[cfg(test)]
pub(crate) mod testing;

pub use cli::run;

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

//! Logging primitives shared across the Conveyor workspace.
//!
//! Layout:
//! - `init.rs`: global `tracing` subscriber installation (pretty or JSON, always stderr)
//! - `log.rs`: the `RenderLog` handle injected into renderers instead of ambient macros

mod init;
mod log;

pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
pub use log::{MemoryLog, RenderLog, TracingLog};

pub mod backend;
pub mod charts;
pub mod config;
pub mod deduplication;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod server;
pub mod types;
pub mod view;

pub use error::{FinviewError, Result};
pub use orchestrator::ScanOrchestrator;

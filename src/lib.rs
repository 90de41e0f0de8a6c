pub mod client;
pub mod export;
pub mod extract;
pub mod model;
pub mod runner;
pub mod utils;

// Re-export common items
pub use client::{AzureDevOpsClient, Credential, TestPlanApi};
pub use export::{ExportConfig, SuiteExporter};
pub use runner::{run_extraction, RunOptions, RunSummary, SuiteSelection};
pub use utils::Config;

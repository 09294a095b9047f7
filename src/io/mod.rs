/// Command-line interface and run orchestration
pub mod cli;
/// Algorithm constants and runtime configuration
pub mod configuration;
/// Error types
pub mod error;
/// Feature and shuffle document loading
pub mod input;
/// Terminal progress bars
pub mod progress;
/// JSON run reports
pub mod report;

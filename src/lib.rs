pub mod cli;
pub mod config;
pub mod i18n;
pub mod llm;
pub mod report;
pub mod research;
pub mod search;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use research::types::{BranchResult, Learning, ResearchOutcome, SourceMetadata};
pub use workflow::launch;

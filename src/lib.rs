pub mod agent;
pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod i18n;
pub mod llm;
pub mod memory;
pub mod search;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use agent::{AgentContext, ResearchPipeline};
pub use config::Config;
pub use search::Aggregator;
pub use types::paper::PaperRecord;

// Public modules
pub mod assembler;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod openalex;
pub mod pipeline;
pub mod render;
pub mod topics;

// Re-export commonly used types
pub use assembler::{assemble, FeedDocument, FeedEntry};
pub use config::Config;
pub use error::FeedError;
pub use io::{save_feed, DEFAULT_OUTPUT_DIR};
pub use models::WorkRecord;
pub use openalex::{OpenAlexClient, WorkQuery, WorkSource};
pub use pipeline::{run, FeedOutcome, RunReport};
pub use render::render_rss;
pub use topics::{default_topics, TopicConfig, TopicTable};

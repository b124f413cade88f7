// Public modules
pub mod comments;
pub mod config;
pub mod error;
pub mod hn;
pub mod io;
pub mod models;
pub mod stories;
pub mod summarizer;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use comments::{collect_comments, trace_comments, CommentFormat, CommentTrace, TraversalLimits};
pub use config::Config;
pub use error::FetchError;
pub use hn::{HackerNewsClient, ItemSource};
pub use io::{default_summary_path, save_summary, PreviewCommand};
pub use models::Item;
pub use stories::{list_top_stories, TOP_STORY_LIMIT};
pub use summarizer::{build_prompt, SummarizerCommand, SummaryOutput};

pub mod config;
pub mod search;

pub use config::{AppConfig, OutputConfig, SearchConfig, SmtpConfig, SmtpSecurity};
pub use search::{SearchDepth, SearchRequest, SearchResponse, SearchResult};

// Tavily SSS - Search, Save, Send
// Web search from the terminal with HTML export and email delivery

pub mod cli;
pub mod export;
pub mod mail;
pub mod models;
pub mod parser;
pub mod search;
pub mod session;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use export::HtmlExporter;
pub use mail::{MailError, Mailer, OutgoingMail, SmtpMailer};
pub use models::{AppConfig, SearchRequest, SearchResponse, SearchResult};
pub use parser::convert;
pub use search::{SearchError, SearchProvider, TavilyClient};
pub use session::{Console, SearchAgent};

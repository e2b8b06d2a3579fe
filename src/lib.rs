pub mod config;
pub mod filter;
pub mod notifier;
mod parser;
pub mod pipeline;
pub mod scraper;
pub mod types;

pub use parser::parse_event_list;
pub use pipeline::{Pipeline, RunOutcome};
pub use scraper::WebScraper;

pub(crate) const DEFAULT_EVENTS_URL: &str = "https://mlh.io/seasons/2024/events";
pub(crate) const DEFAULT_LOCATION_TARGET: &str = "South Africa";
pub(crate) const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub(crate) const DEFAULT_SMTP_PORT: u16 = 587;
pub(crate) const DEFAULT_SUBJECT: &str = "Upcoming Hackathons in South Africa!";

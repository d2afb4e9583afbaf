pub use aggregator::Aggregator;
pub use client::StatsClient;
pub use config::{Endpoints, StatsConfig};
pub use defaults::default_stats;
pub use error::{Result, StatsError};
pub use model::*;
pub use source::{HttpSource, StatsSource};
pub use username::{extract_social_username_from_url, extract_username};

pub mod aggregator;
pub(crate) mod api;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod model;
pub(crate) mod scraper;
pub mod source;
pub(crate) mod unavailable;
pub mod username;

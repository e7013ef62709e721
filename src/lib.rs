pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod scraper;
pub mod summarizer;
pub mod telemetry;
pub mod vector;

use config::Config;
use llm::LlmClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(config: &Config) -> error::Result<Self> {
        let llm = LlmClient::new(config.llm.clone())?;
        Ok(AppState { llm })
    }
}

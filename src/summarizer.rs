use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument};

use crate::error::Result;
use crate::llm::{ChatOptions, LlmClient};
use crate::scraper::Website;

/// Result of summarizing one page.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub url: String,
    pub title: String,
    #[serde(rename = "summary_markdown")]
    pub summary: String,
    pub word_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Fetches `url`, cleans it and asks the model for a short summary.
#[instrument(skip(llm))]
pub async fn summarize(llm: &LlmClient, url: &str) -> Result<Summary> {
    let fetch_start = Instant::now();
    let website = Website::fetch(url).await?;
    info!(
        elapsed = ?fetch_start.elapsed(),
        title = website.title(),
        chars = website.text.len(),
        "page fetched"
    );

    summarize_website(llm, &website).await
}

/// Summarizes an already fetched page.
pub async fn summarize_website(llm: &LlmClient, website: &Website) -> Result<Summary> {
    let llm_start = Instant::now();
    let summary = llm
        .chat_completion(
            &llm.config().summary_model,
            &website.messages(),
            ChatOptions::default(),
        )
        .await?;
    info!(elapsed = ?llm_start.elapsed(), "summary generated");

    Ok(Summary {
        url: website.url.clone(),
        title: website.title().to_string(),
        summary: summary.trim().to_string(),
        word_count: website.word_count(),
        generated_at: Utc::now(),
    })
}

use reqwest::{Client, ClientBuilder};
use scraper::{Html, Node, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use tracing::{debug, instrument};

use crate::error::{AppError, Result};
use crate::llm::ChatMessage;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Title reported for documents without a usable `<title>`.
pub const NO_TITLE: &str = "No title found";

pub const SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of a website \
and provides a short summary, ignoring text that might be navigation related. Respond in markdown.";

/// Elements whose contents never reach the cleaned text.
const STRIPPED_TAGS: [&str; 4] = ["script", "style", "img", "input"];

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

/// A fetched page reduced to its title and visible body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Website {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

impl Website {
    /// Downloads `url` and cleans the returned document.
    ///
    /// A blank URL is rejected before any request is made.
    #[instrument]
    pub async fn fetch(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidUrl);
        }

        let html = fetch_html(url).await?;
        Ok(Self::parse(url, &html))
    }

    pub fn parse(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);

        Website {
            url: url.to_string(),
            title: extract_title(&document),
            text: clean_text(&document),
        }
    }

    /// The page title, or the placeholder when the document had none.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn user_prompt(&self) -> String {
        build_prompt(self.title(), &self.text)
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(self.user_prompt()),
        ]
    }
}

pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch(format!("{} responded with {}", url, status)));
    }

    let html = response
        .text()
        .await
        .map_err(|e| AppError::Fetch(e.to_string()))?;
    debug!(bytes = html.len(), "fetched page");
    Ok(html)
}

pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>())
        .filter(|title| !title.trim().is_empty())
}

/// Collects the body's text nodes, one trimmed line each, skipping anything inside
/// `script`, `style`, `img` or `input`.
pub fn clean_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return String::new();
    };

    let mut lines: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let stripped = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(element) if STRIPPED_TAGS.contains(&element.name()))
        });
        if stripped {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    lines.join("\n")
}

pub fn build_prompt(title: &str, content: &str) -> String {
    let mut result = String::with_capacity(content.len() + title.len() + 200);
    result.push_str("You are looking at a website titled ");
    result.push_str(title);
    result.push_str("\nThe contents of this website are as follows:\nPlease provide a short summary of this website in markdown. ");
    result.push_str("If it includes news or announcements, summarize those too.\n\n");
    result.push_str(content);
    result
}

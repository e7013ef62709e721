use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDINGS_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_PERSONA_PATH: &str = "persona.txt";

/// Settings for the chat and embedding endpoints.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: String,
    pub api_base: String,
    pub api_version: Option<String>,
    pub chat_model: String,
    pub summary_model: String,
    pub embeddings_model: String,
}

/// Bind address of the summary server, kept unparsed so the console assistant never
/// depends on it.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        let port = self.port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&self.host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;
        Ok(SocketAddr::new(ip, port))
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub persona_path: PathBuf,
    pub llm: LlmConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so callers are not tied to the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = var("OPENAI_API_AZURE_KEY")
            .ok_or_else(|| AppError::Config("OPENAI_API_AZURE_KEY is not set".to_string()))?;
        let api_base = var("AZURE_OPENAI_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let llm = LlmConfig {
            api_key,
            api_base,
            api_version: var("OPENAI_API_VERSION"),
            chat_model: var("OPENAI_AZURE_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            summary_model: var("SUMMARY_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embeddings_model: var("OPENAI_API_EMBEDDINGS_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDINGS_MODEL.to_string()),
        };

        // Server configuration with defaults, validated by `ServerConfig::addr`
        let server = ServerConfig {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").unwrap_or_else(|| "3000".to_string()),
        };

        let persona_path = var("PERSONA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PERSONA_PATH));

        Ok(Config {
            server,
            persona_path,
            llm,
        })
    }
}

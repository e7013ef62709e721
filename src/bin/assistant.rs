use std::io;
use page_digest::{
    assistant,
    config::Config,
    llm::LlmClient,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the conversation, so diagnostics go to stderr
    init_tracing("warn", io::stderr);

    let config = Config::load()?;
    let llm = LlmClient::new(config.llm.clone())?;

    let stdin = io::stdin();
    assistant::run(llm, &config.persona_path, stdin.lock(), io::stdout()).await?;

    Ok(())
}

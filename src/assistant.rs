//! Console question-answering loop driven by a persona file.

use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::persona::{build_prompt, load_persona};
use crate::vector::{normalize, preview};

pub const EXIT_COMMAND: &str = "exit";
pub const PROMPT: &str = "\nAsk about your cases: ";
const PREVIEW_COMPONENTS: usize = 5;

const ANSWER_OPTIONS: ChatOptions = ChatOptions {
    max_tokens: Some(150),
    temperature: Some(0.7),
};

/// Answers questions in the voice of a persona.
pub struct Assistant {
    llm: LlmClient,
    persona: String,
}

impl Assistant {
    pub fn new(llm: LlmClient, persona: String) -> Self {
        Self { llm, persona }
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str) -> Result<String> {
        let messages = [
            ChatMessage::system(build_prompt(&self.persona, query)),
            ChatMessage::user(query),
        ];
        self.llm
            .chat_completion(&self.llm.config().chat_model, &messages, ANSWER_OPTIONS)
            .await
    }

    pub async fn embed(&self, query: &str) -> Result<Vec<f32>> {
        self.llm.embedding(query).await
    }
}

/// True for the case-insensitive `exit` sentinel.
pub fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// Runs the interactive loop until `exit` or end of input.
///
/// The persona is read once up front; when it is missing the sentinel message is printed and
/// the loop never starts.
pub async fn run<R, W>(llm: LlmClient, persona_path: &Path, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Hello! I'm Sneek Assistant. Ask me anything related to Indonesian Law.")?;
    writeln!(output, "Type 'exit' to quit.")?;

    let persona = match load_persona(persona_path) {
        Ok(persona) => persona,
        Err(err) => {
            warn!(path = %persona_path.display(), "persona unavailable");
            writeln!(output, "{}", err)?;
            return Ok(());
        }
    };
    writeln!(output, "Persona loaded.")?;

    let assistant = Assistant::new(llm, persona);
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            info!("input closed");
            break;
        }

        let query = line.trim_end_matches(['\r', '\n']);
        if is_exit(query) {
            writeln!(output, "Goodbye!")?;
            break;
        }

        handle_query(&assistant, query, &mut output).await?;
    }

    Ok(())
}

async fn handle_query<W: Write>(assistant: &Assistant, query: &str, output: &mut W) -> Result<()> {
    let vector = match assistant.embed(query).await {
        Ok(vector) => vector,
        Err(err) => {
            writeln!(output, "Error: {}", err)?;
            writeln!(output, "Error converting question to vector.")?;
            return Ok(());
        }
    };

    match assistant.answer(query).await {
        Ok(answer) => writeln!(output, "\nAssistant Response (Text): {}", answer)?,
        Err(err) => writeln!(output, "\nAssistant Response (Text): Error: {}", err)?,
    }

    let normalized = normalize(&vector);
    writeln!(output, "\nAssistant Response (Vector):")?;
    writeln!(output, "Query Vector: {}", preview(&normalized, PREVIEW_COMPONENTS))?;

    Ok(())
}

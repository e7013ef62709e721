use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AppError, Result};

/// Reads the persona file verbatim.
///
/// A missing file is reported as [`AppError::PersonaMissing`], whose message is the
/// fixed `Error: Persona file not found.` line shown to the user.
pub fn load_persona(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(persona) => Ok(persona),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(AppError::PersonaMissing(path.to_path_buf()))
        }
        Err(err) => Err(AppError::Io(err)),
    }
}

/// System prompt for one question: the persona followed by a question/answer scaffold.
pub fn build_prompt(persona: &str, query: &str) -> String {
    format!("{}\nQuestion: {}\nAnswer:", persona, query)
}

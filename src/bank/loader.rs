// src/bank/loader.rs
use std::fs;
use std::path::Path;
use serde::Deserialize;
use crate::bank::models::QuestionRecord;
use crate::utils::error::BankError;

/// What an input file turned out to contain.
#[derive(Debug, Clone)]
pub enum InputDocument {
    Bank(Vec<QuestionRecord>),
    Text(String),
}

// Exports come either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    List(Vec<QuestionRecord>),
    Wrapped { questions: Vec<QuestionRecord> },
}

/// Loads `path` as a question bank when it has a `.json` extension, otherwise as raw
/// annotated explanation text.
pub fn load_input(path: &Path) -> Result<InputDocument, BankError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        return load_question_bank(path).map(InputDocument::Bank);
    }

    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(BankError::Empty(path.display().to_string()));
    }
    tracing::debug!("Loaded {} bytes of explanation text from {}", text.len(), path.display());
    Ok(InputDocument::Text(text))
}

pub fn load_question_bank(path: &Path) -> Result<Vec<QuestionRecord>, BankError> {
    tracing::info!("Loading question bank from: {}", path.display());
    let raw = fs::read_to_string(path)?;
    parse_question_bank(&raw, &path.display().to_string())
}

/// Parses bank JSON. `source` only labels errors and logs.
pub fn parse_question_bank(raw: &str, source: &str) -> Result<Vec<QuestionRecord>, BankError> {
    let questions = match serde_json::from_str::<BankFile>(raw) {
        Ok(BankFile::List(questions)) | Ok(BankFile::Wrapped { questions }) => questions,
        Err(_) => {
            // Re-parse as a list to surface a precise serde error (line/column)
            serde_json::from_str::<Vec<QuestionRecord>>(raw)?
        }
    };

    if questions.is_empty() {
        return Err(BankError::Empty(source.to_string()));
    }

    tracing::info!("Loaded {} questions from {}", questions.len(), source);
    Ok(questions)
}

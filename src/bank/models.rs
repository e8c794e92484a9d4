// src/bank/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use crate::extractors::marker::OptionKey;

/// One question as exported from the question bank.
/// Aliases cover the camel-case and plural spellings found in exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, alias = "question_text", alias = "questionText")]
    pub question: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(alias = "correctAnswer", alias = "correct_option")]
    pub correct_answer: String,
    /// General explanation of the correct answer.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Free-form text explaining why each incorrect option is wrong.
    #[serde(default, alias = "incorrectExplanation", alias = "incorrect_explanations")]
    pub incorrect_explanation: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl QuestionRecord {
    pub fn correct_key(&self) -> Option<OptionKey> {
        OptionKey::parse(&self.correct_answer)
    }

    /// Options with a valid A-E key, in key order. Other keys are skipped.
    pub fn option_entries(&self) -> Vec<(OptionKey, &str)> {
        let mut entries: Vec<(OptionKey, &str)> = self
            .options
            .iter()
            .filter_map(|(raw_key, text)| match OptionKey::parse(raw_key) {
                Some(key) => Some((key, text.as_str())),
                None => {
                    tracing::warn!("Question {}: skipping option with invalid key '{}'", self.id, raw_key);
                    None
                }
            })
            .collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// What the feedback view shows for one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionFeedback {
    pub key: OptionKey,
    pub option_text: String,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFeedback {
    pub question_id: String,
    pub options: Vec<OptionFeedback>,
    /// Incorrect options in the question.
    pub incorrect: usize,
    /// Incorrect options that received an explanation.
    pub explained: usize,
}

impl QuestionFeedback {
    pub fn new(question_id: String, options: Vec<OptionFeedback>) -> Self {
        let incorrect = options.iter().filter(|o| !o.is_correct).count();
        let explained = options.iter().filter(|o| !o.is_correct && o.explanation.is_some()).count();
        Self { question_id, options, incorrect, explained }
    }

    pub fn option(&self, key: OptionKey) -> Option<&OptionFeedback> {
        self.options.iter().find(|o| o.key == key)
    }
}

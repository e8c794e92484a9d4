// src/extractors/feedback.rs
use crate::bank::models::{OptionFeedback, QuestionFeedback, QuestionRecord};
use crate::extractors::explanation::ExplanationSegmenter;

/// Builds the per-option feedback shown once a question is answered.
///
/// Incorrect options get their slice of `incorrect_explanation`; the correct option
/// gets the general `explanation` and is never looked up in the incorrect text.
pub fn build_question_feedback(segmenter: &ExplanationSegmenter, question: &QuestionRecord) -> QuestionFeedback {
    let correct = question.correct_key();
    if correct.is_none() {
        tracing::warn!("Question {}: correct answer '{}' is not an option key", question.id, question.correct_answer);
    }

    // Segment once, answer every option from the same index
    let index = question
        .incorrect_explanation
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .map(|text| segmenter.index(text));

    let options: Vec<OptionFeedback> = question
        .option_entries()
        .into_iter()
        .map(|(key, option_text)| {
            let is_correct = correct == Some(key);
            let explanation = if is_correct {
                question
                    .explanation
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_owned)
            } else {
                index.as_ref().and_then(|i| i.explanation(key)).map(str::to_owned)
            };
            OptionFeedback { key, option_text: option_text.to_string(), is_correct, explanation }
        })
        .collect();

    let feedback = QuestionFeedback::new(question.id.clone(), options);
    tracing::debug!(
        "Question {}: explained {}/{} incorrect options",
        feedback.question_id,
        feedback.explained,
        feedback.incorrect
    );
    feedback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::marker::OptionKey;
    use std::collections::BTreeMap;

    fn question(correct: &str, incorrect_explanation: Option<&str>) -> QuestionRecord {
        let options: BTreeMap<String, String> = [
            ("A", "3 meses"),
            ("B", "6 meses"),
            ("C", "9 meses"),
            ("D", "10 meses"),
            ("E", "12 meses"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        QuestionRecord {
            id: "lactancia-01".to_string(),
            question: "¿A qué edad se inicia la alimentación complementaria?".to_string(),
            options,
            correct_answer: correct.to_string(),
            explanation: Some("  A los 6 meses de vida.  ".to_string()),
            incorrect_explanation: incorrect_explanation.map(str::to_owned),
            topic: Some("Pediatría".to_string()),
        }
    }

    #[test]
    fn correct_option_is_never_extracted() {
        // B has a marker, but it is the correct answer
        let text = "A) Muy precoz.\nB) No debería aparecer.\n**C) 9 meses, D) 10 meses, E) 12 meses:** Tardío.";
        let feedback = build_question_feedback(&ExplanationSegmenter::new(), &question("B", Some(text)));

        let correct = feedback.option(OptionKey::B).unwrap();
        assert!(correct.is_correct);
        assert_eq!(correct.explanation.as_deref(), Some("A los 6 meses de vida."));
        assert_eq!(feedback.option(OptionKey::A).unwrap().explanation.as_deref(), Some("Muy precoz."));
        assert_eq!(feedback.option(OptionKey::E).unwrap().explanation.as_deref(), Some("Tardío."));
        assert_eq!(feedback.incorrect, 4);
        assert_eq!(feedback.explained, 4);
    }

    #[test]
    fn missing_segments_are_left_empty() {
        let feedback = build_question_feedback(&ExplanationSegmenter::new(), &question("b", Some("A) Muy precoz.")));
        assert_eq!(feedback.explained, 1);
        assert_eq!(feedback.option(OptionKey::C).unwrap().explanation, None);

        let feedback = build_question_feedback(&ExplanationSegmenter::new(), &question("B", None));
        assert_eq!(feedback.explained, 0);
        assert_eq!(feedback.options.len(), 5);
    }
}

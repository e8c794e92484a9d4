// src/bank/mod.rs
pub mod loader;
pub mod models;

pub use loader::{load_input, load_question_bank, InputDocument};
pub use models::{OptionFeedback, QuestionFeedback, QuestionRecord};

// src/lib.rs
//! Per-option explanation extraction for multiple-choice exam questions.
//!
//! Question banks store one free-form "why the other options are wrong" text per
//! question. [`extract_explanation_for_option`] slices that text into the part
//! written for a single option letter, tolerating the authoring conventions seen
//! in practice:
//!
//! ```
//! use explanation_segmenter::extract_explanation_for_option;
//!
//! let text = "**A) 3 meses:** Demasiado precoz.\n\
//!             **C) 9 meses, D) 10 meses, E) 12 meses:** Iniciar a los 6 meses.";
//! assert_eq!(extract_explanation_for_option(Some(text), "d").as_deref(), Some("Iniciar a los 6 meses."));
//! assert_eq!(extract_explanation_for_option(Some(text), "B"), None);
//! ```
pub mod bank;
pub mod extractors;
pub mod storage;
pub mod utils;

pub use extractors::{
    build_question_feedback,
    extract_explanation_for_option,
    ExplanationSegmenter,
    MarkerStyle,
    OptionKey,
    Segment,
    SegmentIndex,
};
pub use utils::config::SegmenterConfig;

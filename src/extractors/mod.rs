// src/extractors/mod.rs
pub mod explanation;
pub mod feedback;
pub mod marker;

// Re-export key extraction types for convenience
pub use explanation::{
    clean_body,
    extract_explanation_for_option,
    ExplanationSegmenter,
    Segment,
    SegmentIndex,
};
pub use feedback::build_question_feedback;
pub use marker::{MarkerStyle, OptionKey};

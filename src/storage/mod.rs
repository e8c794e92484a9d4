// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::bank::models::QuestionFeedback;
use crate::extractors::explanation::Segment;
use crate::utils::error::StorageError;

/// Counts recorded alongside every saved report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub questions: usize,
    pub incorrect_options: usize,
    pub explained_options: usize,
    pub segments: usize,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding every file written for one input: /base_dir/stem/
    pub fn target_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(stem);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)
                .map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves per-question option feedback as JSON
    pub fn save_feedback(&self, stem: &str, feedback: &[QuestionFeedback]) -> Result<PathBuf, StorageError> {
        let file_path = self.target_dir(stem)?.join(format!("{}_feedback.json", stem));
        self.write_json(&file_path, &feedback)?;
        tracing::info!("Saved feedback for {} questions to {}", feedback.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves the segments found in a raw explanation text as JSON
    pub fn save_segments(&self, stem: &str, segments: &[Segment]) -> Result<PathBuf, StorageError> {
        let file_path = self.target_dir(stem)?.join(format!("{}_segments.json", stem));
        self.write_json(&file_path, &segments)?;
        tracing::info!("Saved {} segments to {}", segments.len(), file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the run in JSON format
    pub fn save_run_metadata(&self, stem: &str, summary: &RunSummary) -> Result<PathBuf, StorageError> {
        let file_path = self.target_dir(stem)?.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "source": summary.source,
            "questions": summary.questions,
            "incorrect_options": summary.incorrect_options,
            "explained_options": summary.explained_options,
            "segments": summary.segments,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.write_json(&file_path, &metadata)?;
        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_path: &Path, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(file_path, json).map_err(StorageError::IoError)
    }
}

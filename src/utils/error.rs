// src/utils/error.rs
use thiserror::Error;

// Extraction itself has no error type: a missing segment is `None`, not a failure.

#[derive(Error, Debug)]
pub enum BankError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Input is empty: {0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Failed to load input: {0}")]
    Bank(#[from] BankError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

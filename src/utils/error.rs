use std::io;
use thiserror::Error;

/// Main error type for the DMG background generator.
#[derive(Debug, Error)]
pub enum DmgError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// An invalid argument was provided
    #[error("Invalid argument: {0}")]
    InvalidArg(String),
    /// An invalid operation was attempted
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// A malformed PNG stream was encountered
    #[error("Stream error: {0}")]
    Stream(String),
    /// The zlib compressor failed
    #[error("Compression error: {0}")]
    Compression(String),
}

/// A specialized `Result` type for PNG generation.
pub type Result<T> = std::result::Result<T, DmgError>;

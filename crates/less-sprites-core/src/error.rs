use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteError {
    /// A specs file, source directory or source image is missing.
    #[error("Source file \"{}\" does not exist.", .0.display())]
    NotFound(PathBuf),
    /// Required configuration is missing or nothing is left to pack.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// Measuring, decoding or writing an image failed.
    #[error("Processing error for {}: {message}", path.display())]
    Processing { path: PathBuf, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpriteError {
    pub(crate) fn processing(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Processing {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;

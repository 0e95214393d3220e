use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Translation error: {0}")]
    Translation(String),
    #[error("Model load error: {0}")]
    ModelLoad(String),
    #[error("Generation error: {0}")]
    Generation(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("AWS error: {0}")]
    Aws(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<serde_json::Error> for ForgeError {
    fn from(e: serde_json::Error) -> Self {
        ForgeError::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for ForgeError {
    fn from(e: base64::DecodeError) -> Self {
        ForgeError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

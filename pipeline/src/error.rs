use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Feature set error: {0}")]
    Feature(String),

    #[error("Pipeline config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

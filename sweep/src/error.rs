use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Result store error: {0}")]
    Store(String),

    #[error("Search modules error: {0}")]
    Modules(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] retri_pipeline::PipelineError),
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error in {path}: {message}")]
    Catalog { path: String, message: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is empty: {0}")]
    EmptyCatalog(String),

    #[error("index error: {0}")]
    Index(String),

    #[error(transparent)]
    Common(#[from] assistant_common::error::CommonError),
}

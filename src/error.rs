use thiserror::Error;

#[derive(Error, Debug)]
pub enum GastosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("'{value}' is not a valid {field}")]
    InvalidOption { field: &'static str, value: String },

    #[error("Field {0} does not take that kind of value")]
    FieldKind(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GastosError>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid data root: {0}")]
    InvalidRoot(String),

    #[error("Invalid page template: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {url} returned {status}")]
    NotFound { status: u16, url: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Malformed route: {0}")]
    MalformedRoute(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Carousel has been disposed")]
    Disposed,

    #[error("Slide index {index} out of range ({len} panels)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown light target: {0}")]
    UnknownTarget(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid brightness mode: {0}")]
    InvalidBrightnessMode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

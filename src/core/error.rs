use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgdexError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializeError(String),
}

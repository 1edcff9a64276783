pub mod password;

pub use password::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

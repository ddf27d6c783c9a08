use std::path::PathBuf;

use thiserror::Error;

use crate::light::LightId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no light registered for {0:?}")]
    MissingLight(LightId),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to access property {key}: {reason}")]
    Property { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

// src/error.rs
use std::path::PathBuf;

use crate::browser::BrowserError;
use crate::portal::PortalError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("xlsx read error in {path}: {message}")]
    XlsxRead { path: PathBuf, message: String },

    #[error("{path} row {row}: {message}")]
    Row { path: PathBuf, row: usize, message: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Portal(#[from] PortalError),
}

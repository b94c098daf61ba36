use bridge_traits::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input folder does not exist: {0}")]
    InputRootMissing(PathBuf),

    #[error("{path} is not inside the input root {root}")]
    OutsideInputRoot { path: PathBuf, root: PathBuf },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, ScanError>;

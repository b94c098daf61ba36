use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unsupported platform: {0}. Only Linux is supported.")]
    UnsupportedPlatform(String),

    #[error("{0} not found. Install it and make sure it is on the PATH.")]
    ToolNotFound(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, ToolError>;

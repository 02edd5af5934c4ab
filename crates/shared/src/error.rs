use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty message frame")]
    EmptyFrame,
    #[error("malformed message frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

use std::str::Utf8Error;

use thiserror::Error;

use crate::id::AvatarId;

pub type Result<T> = std::result::Result<T, BubbleChatError>;

#[derive(Error, Debug)]
pub enum BubbleChatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Avatar {0} not found")]
    NotFound(AvatarId),
    #[error("Parsing error")]
    Parse,
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<Utf8Error> for BubbleChatError {
    fn from(_: Utf8Error) -> Self {
        Self::Parse
    }
}

impl From<serde_json::Error> for BubbleChatError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<url::ParseError> for BubbleChatError {
    fn from(value: url::ParseError) -> Self {
        Self::Other(anyhow::anyhow!(value.to_string()))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Client(#[from] bill_console_client::Error),
    #[error("settings store failed: {0}")]
    Store(#[from] sled::Error),
    #[error("stored value for {0} is not valid utf-8")]
    Encoding(String),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

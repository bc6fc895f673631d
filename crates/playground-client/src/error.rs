use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(String),

    /// The playground answered with a non-success status (e.g. 404 for an unknown code).
    #[error("Playground returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Too much time passed while waiting for {waiting_for}")]
    Timeout { waiting_for: String },
}

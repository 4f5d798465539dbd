use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetgraphError {
    /// A line could not be split into protocol, two endpoints, state and PID.
    #[error("malformed connection line: {line:?}")]
    MalformedLine { line: String },

    /// No local address was discovered, so the local node name is empty.
    #[error("no local addresses discovered in capture {capture}")]
    EmptyLocalAddressSet { capture: String },

    /// An established connection points back at the local node itself.
    #[error("capture {capture}: connection to own address {address} skipped")]
    SelfConnection { capture: String, address: String },

    #[error("graph invariant violated in capture {capture}: {detail}")]
    InvariantViolation { capture: String, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetgraphError>;

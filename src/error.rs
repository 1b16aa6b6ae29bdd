use thiserror::Error;

pub type Result<T> = core::result::Result<T, ConnectError>;

#[derive(Debug, Error)]
pub enum ConnectError {
    /// The remote application could not be reached at connect time.
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session is not connected")]
    NotConnected,

    /// Handshake or frame bytes did not match the protocol; the session is out of sync.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The remote side answered NACK.
    #[error("sent \"{command}\"; got \"{response}\"")]
    CommandRejected { command: String, response: String },

    #[error("invalid object name \"{name}\": {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    #[error("value {value} outside range [{}, {}]", fmt_bound(.min), fmt_bound(.max))]
    OutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("invalid {label} \"{value}\", expected one of {choices:?}")]
    InvalidChoice {
        label: &'static str,
        value: String,
        choices: Vec<&'static str>,
    },

    #[error("{constraint} constraint requires min and max together")]
    UnpairedBounds { constraint: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{operation} is not supported for {class}")]
    NotSupported {
        operation: &'static str,
        class: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConnectError {
    /// Errors after which the stream can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConnectError::UnexpectedResponse(_) | ConnectError::Io(_))
    }

    /// Local validation failures, raised before anything is written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConnectError::InvalidIdentifier { .. }
                | ConnectError::OutOfRange { .. }
                | ConnectError::InvalidChoice { .. }
                | ConnectError::UnpairedBounds { .. }
                | ConnectError::InvalidArgument(_)
                | ConnectError::NotSupported { .. }
        )
    }
}

fn fmt_bound(bound: &Option<f64>) -> String {
    bound.map_or_else(|| "-".to_string(), |b| b.to_string())
}

//! Shared error type across gqlsub crates.

use thiserror::Error;

/// Stable error codes for logs and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect/send/receive failure on the underlying connection.
    Transport,
    /// Server answered `connection_init` with `connection_error`.
    HandshakeRejected,
    /// Unexpected or undecodable frame during the handshake.
    HandshakeMalformed,
    /// Handshake aborted by the caller's cancellation signal.
    HandshakeCancelled,
    /// No handshake answer before the deadline.
    HandshakeTimeout,
    /// Malformed inbound frame.
    FrameDecode,
    /// Inbound frame for an id with no live subscription.
    UnknownSubscription,
    /// Outbound payload could not be serialized.
    Encode,
    /// Operation on a client that has already shut down.
    Closed,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
}

impl ErrorKind {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::HandshakeRejected => "HANDSHAKE_REJECTED",
            ErrorKind::HandshakeMalformed => "HANDSHAKE_MALFORMED",
            ErrorKind::HandshakeCancelled => "HANDSHAKE_CANCELLED",
            ErrorKind::HandshakeTimeout => "HANDSHAKE_TIMEOUT",
            ErrorKind::FrameDecode => "FRAME_DECODE",
            ErrorKind::UnknownSubscription => "UNKNOWN_SUBSCRIPTION",
            ErrorKind::Encode => "ENCODE",
            ErrorKind::Closed => "CLOSED",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GqlSubError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum GqlSubError {
    #[error("transport: {0}")]
    Transport(String),
    /// Carries the server's `connection_error` payload verbatim.
    #[error("{0}")]
    HandshakeRejected(String),
    #[error("handshake failed: {0}")]
    HandshakeMalformed(String),
    #[error("handshake cancelled")]
    HandshakeCancelled,
    #[error("handshake timed out")]
    HandshakeTimeout,
    #[error("frame decode: {0}")]
    FrameDecode(String),
    #[error("unknown subscription: {0}")]
    UnknownSubscription(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("client closed")]
    Closed,
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}

impl GqlSubError {
    /// Map an error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GqlSubError::Transport(_) => ErrorKind::Transport,
            GqlSubError::HandshakeRejected(_) => ErrorKind::HandshakeRejected,
            GqlSubError::HandshakeMalformed(_) => ErrorKind::HandshakeMalformed,
            GqlSubError::HandshakeCancelled => ErrorKind::HandshakeCancelled,
            GqlSubError::HandshakeTimeout => ErrorKind::HandshakeTimeout,
            GqlSubError::FrameDecode(_) => ErrorKind::FrameDecode,
            GqlSubError::UnknownSubscription(_) => ErrorKind::UnknownSubscription,
            GqlSubError::Encode(_) => ErrorKind::Encode,
            GqlSubError::Closed => ErrorKind::Closed,
            GqlSubError::BadConfig(_) => ErrorKind::BadConfig,
            GqlSubError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
        }
    }

    /// True for the errors that end a handshake attempt.
    pub fn is_handshake(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::HandshakeRejected
                | ErrorKind::HandshakeMalformed
                | ErrorKind::HandshakeCancelled
                | ErrorKind::HandshakeTimeout
        )
    }
}

//! Error types for the session layer.

/// Errors that can occur while resolving who a connection belongs to.
///
/// Neither is fatal to the connection: the hub admits the caller as a
/// guest instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// The [`Authenticator`](crate::Authenticator) rejected the token.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The token is not a usable display name.
    #[error("invalid display name: {0}")]
    InvalidName(String),
}

//! Authentication hook for resolving who a connection belongs to.
//!
//! The bingo hall doesn't implement login itself. That is the web
//! layer's job: it authenticates the user, then opens the room socket
//! with a `token` query parameter. The hub hands that token to an
//! [`Authenticator`] to get a [`PlayerName`].
//!
//! Unlike a game lobby, the room never turns anyone away. A missing or
//! rejected token still gets in, as a guest: see [`resolve_identity`].

use bingo_protocol::{Identity, PlayerName};

use crate::SessionError;

/// Validates a connection's token and returns the player's display name.
///
/// # Trait bounds
///
/// - `Send + Sync` → the authenticator is shared by every connection
///   task.
/// - `'static` → it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use bingo_session::{Authenticator, SessionError};
/// use bingo_protocol::PlayerName;
///
/// /// Accepts a fixed set of players.
/// struct AllowList(Vec<String>);
///
/// impl Authenticator for AllowList {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<PlayerName, SessionError> {
///         if self.0.iter().any(|name| name == token) {
///             Ok(PlayerName::new(token))
///         } else {
///             Err(SessionError::AuthFailed(format!("{token} not allowed")))
///         }
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the player's name.
    ///
    /// # Returns
    /// - `Ok(PlayerName)`: the connection belongs to this player
    /// - `Err(SessionError)`: the token was rejected
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<PlayerName, SessionError>> + Send;
}

/// Resolves a connection's identity, falling back to
/// [`Identity::Guest`] when there is no token or it is rejected.
pub async fn resolve_identity<A: Authenticator>(
    auth: &A,
    token: Option<&str>,
) -> Identity {
    let Some(token) = token else {
        return Identity::Guest;
    };

    match auth.authenticate(token).await {
        Ok(name) => Identity::Player(name),
        Err(e) => {
            tracing::debug!(error = %e, "token rejected, admitting as guest");
            Identity::Guest
        }
    }
}

/// Trusts the token to be the display name the login layer issued.
///
/// Only checks that it is a sensible name: not blank, no control
/// characters, at most [`MAX_NAME_LEN`](Self::MAX_NAME_LEN) characters.
/// Surrounding whitespace is trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedNameAuthenticator;

impl TrustedNameAuthenticator {
    /// Longest accepted display name, in characters.
    pub const MAX_NAME_LEN: usize = 150;
}

impl Authenticator for TrustedNameAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<PlayerName, SessionError> {
        let name = token.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidName("empty name".into()));
        }
        if name.chars().count() > Self::MAX_NAME_LEN {
            return Err(SessionError::InvalidName(format!(
                "longer than {} characters",
                Self::MAX_NAME_LEN
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(SessionError::InvalidName(
                "contains control characters".into(),
            ));
        }
        Ok(PlayerName::new(name))
    }
}

//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and their wire
//! form. Browsers in the room read text frames, so encoding produces a
//! `String`; decoding accepts raw bytes because inbound frames may arrive
//! as text or binary.

use serde::{de::DeserializeOwned, Serialize};

use crate::{ClientMessage, ProtocolError};

/// A codec that can encode Rust types to text and decode bytes back.
///
/// `Send + Sync + 'static` lets one codec instance be shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into its text form.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// Decodes an inbound frame into a [`ClientMessage`] the room can act on.
///
/// Frames whose `type` tag is not a known kind decode to
/// [`ClientMessage::Unsupported`]; this function turns that into
/// [`ProtocolError::UnsupportedType`] so callers only ever see actionable
/// variants on the `Ok` path.
pub fn decode_client_message<C: Codec>(
    codec: &C,
    data: &[u8],
) -> Result<ClientMessage, ProtocolError> {
    match codec.decode::<ClientMessage>(data)? {
        ClientMessage::Unsupported => Err(ProtocolError::UnsupportedType),
        msg => Ok(msg),
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is the format the browser client speaks. It is behind the `json`
/// feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use bingo_protocol::{Ball, Codec, JsonCodec, ServerEvent};
///
/// let codec = JsonCodec;
/// let event = ServerEvent::NewBall { number: Ball::new(42).unwrap() };
///
/// let text = codec.encode(&event).unwrap();
/// assert_eq!(text, r#"{"type":"new_ball","number":42}"#);
///
/// let decoded: ServerEvent = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(decoded, event);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

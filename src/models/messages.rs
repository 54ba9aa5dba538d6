use thiserror::Error;

/// Leading byte of the control messages the relay interprets itself.
/// Every other leading byte is relayed untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ServerMessageType {
    AcquireLock = 127,
    ReleaseLock = 126,
    RequestInitializedContent = 125,
    PutInitializedContent = 124,
    RenameSession = 123,
}

impl ServerMessageType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            127 => Some(Self::AcquireLock),
            126 => Some(Self::ReleaseLock),
            125 => Some(Self::RequestInitializedContent),
            124 => Some(Self::PutInitializedContent),
            123 => Some(Self::RenameSession),
            _ => None,
        }
    }
}

/// y-protocols message type of awareness updates.
pub const MESSAGE_AWARENESS: u8 = 1;

/// `messageSync` + `syncStep1` with an empty state vector.
pub const SYNC_STEP1_HANDSHAKE: [u8; 4] = [0, 0, 1, 0];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("empty message")]
    Empty,
    #[error("lock token must be 4 bytes, got {0}")]
    MalformedLockToken(usize),
    #[error("room name is not valid UTF-8")]
    InvalidRoomName,
}

/// An inbound binary frame, decoded once by its leading byte.
#[derive(Debug, PartialEq, Eq)]
pub enum ClientMessage<'a> {
    AcquireLock,
    ReleaseLock { token: u32 },
    RequestInitializedContent,
    PutInitializedContent(&'a [u8]),
    RenameSession { room_id: &'a str },
    /// Anything else, relayed verbatim. `raw` includes the type byte.
    Relay { kind: u8, raw: &'a [u8] },
}

impl<'a> ClientMessage<'a> {
    pub fn decode(raw: &'a [u8]) -> Result<Self, MessageError> {
        let (&kind, payload) = raw.split_first().ok_or(MessageError::Empty)?;
        let Some(control) = ServerMessageType::from_byte(kind) else {
            return Ok(Self::Relay { kind, raw });
        };

        match control {
            ServerMessageType::AcquireLock => Ok(Self::AcquireLock),
            ServerMessageType::ReleaseLock => {
                let token: [u8; 4] = payload
                    .try_into()
                    .map_err(|_| MessageError::MalformedLockToken(payload.len()))?;
                Ok(Self::ReleaseLock { token: u32::from_le_bytes(token) })
            }
            ServerMessageType::RequestInitializedContent => Ok(Self::RequestInitializedContent),
            ServerMessageType::PutInitializedContent => Ok(Self::PutInitializedContent(payload)),
            ServerMessageType::RenameSession => {
                let room_id =
                    std::str::from_utf8(payload).map_err(|_| MessageError::InvalidRoomName)?;
                Ok(Self::RenameSession { room_id })
            }
        }
    }
}

/// `[127] + token (u32 LE)`
pub fn lock_acquired_reply(token: u32) -> Vec<u8> {
    let mut reply = Vec::with_capacity(5);
    reply.push(ServerMessageType::AcquireLock as u8);
    reply.extend_from_slice(&token.to_le_bytes());
    reply
}

/// `[125] + content`
pub fn initialized_content_reply(content: &[u8]) -> Vec<u8> {
    let mut reply = Vec::with_capacity(content.len() + 1);
    reply.push(ServerMessageType::RequestInitializedContent as u8);
    reply.extend_from_slice(content);
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_control_codes() {
        assert_eq!(ClientMessage::decode(&[127]), Ok(ClientMessage::AcquireLock));
        assert_eq!(
            ClientMessage::decode(&[126, 0x10, 0x27, 0, 0]),
            Ok(ClientMessage::ReleaseLock { token: 10_000 })
        );
        assert_eq!(
            ClientMessage::decode(&[125]),
            Ok(ClientMessage::RequestInitializedContent)
        );
        assert_eq!(
            ClientMessage::decode(&[124, 1, 2]),
            Ok(ClientMessage::PutInitializedContent(&[1, 2]))
        );
        assert_eq!(
            ClientMessage::decode(b"\x7bnotebooks/a.ipynb"),
            Ok(ClientMessage::RenameSession { room_id: "notebooks/a.ipynb" })
        );
    }

    #[test]
    fn other_bytes_are_relayed_whole() {
        let raw = [0u8, 1, 2, 3];
        assert_eq!(ClientMessage::decode(&raw), Ok(ClientMessage::Relay { kind: 0, raw: &raw }));
        assert_eq!(
            ClientMessage::decode(&[122]),
            Ok(ClientMessage::Relay { kind: 122, raw: &[122] })
        );
    }

    #[test]
    fn malformed_control_payloads_are_errors() {
        assert_eq!(ClientMessage::decode(&[]), Err(MessageError::Empty));
        assert_eq!(
            ClientMessage::decode(&[126, 1, 2]),
            Err(MessageError::MalformedLockToken(2))
        );
        assert_eq!(
            ClientMessage::decode(&[123, 0xff, 0xfe]),
            Err(MessageError::InvalidRoomName)
        );
    }

    #[test]
    fn replies_carry_type_byte() {
        assert_eq!(lock_acquired_reply(0x0102_0304), vec![127, 4, 3, 2, 1]);
        assert_eq!(initialized_content_reply(&[]), vec![125]);
        assert_eq!(initialized_content_reply(&[7, 8]), vec![125, 7, 8]);
    }
}

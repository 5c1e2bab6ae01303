//! APDU codec as described in ISO/IEC 7816-4, short form only.

mod command;
mod response;

pub use command::{Command, EncodedCommand, MAX_EXPECTED_LENGTH, MAX_PAYLOAD_LENGTH};
pub use response::{Response, StatusWord};

/// Errors raised while encoding a command into octets.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("Payload of {0} octets does not fit in a single Lc octet")]
    PayloadTooLong(usize),

    #[error("Expected response length {0} does not fit in a single Le octet")]
    ExpectedLengthTooLarge(u16),
}

/// Encodes the command into the octets to be transmitted.
/// Shorthand for [`Command::encode`].
pub fn encode(command: &Command) -> Result<EncodedCommand, EncodingError> {
    command.encode()
}

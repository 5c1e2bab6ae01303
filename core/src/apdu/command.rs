use crate::apdu::EncodingError;

/// Largest payload that can be announced in the single Lc octet.
pub const MAX_PAYLOAD_LENGTH: usize = 0xFF;

/// Largest expected response length that can be announced in the single Le octet.
pub const MAX_EXPECTED_LENGTH: u16 = 0xFF;

const HEADER_LENGTH: usize = 4;

// Sent in place of an empty payload so that Lc is never zero.
const EMPTY_PAYLOAD: [u8; 1] = [0x00];

/// An APDU command to be transmitted
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Command {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    payload: Vec<u8>,
    le: u16,
}

impl Command {
    /// Constructs an command with CLA, INS, P1, and P2.
    /// No payloads will be transmitted or received.
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            payload: Vec::new(),
            le: 0,
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, and Le.
    /// A payload will be received.
    pub fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: u16) -> Self {
        Self {
            le,
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, and a payload.
    pub fn new_with_payload(cla: u8, ins: u8, p1: u8, p2: u8, payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, Le, and a payload.
    pub fn new_with_payload_le(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        le: u16,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            payload,
            le,
            ..Self::new(cla, ins, p1, p2)
        }
    }

    pub fn cla(&self) -> u8 {
        self.cla
    }

    pub fn ins(&self) -> u8 {
        self.ins
    }

    pub fn p1(&self) -> u8 {
        self.p1
    }

    pub fn p2(&self) -> u8 {
        self.p2
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Expected length of the response. Zero means no Le octet is sent.
    pub fn le(&self) -> u16 {
        self.le
    }

    /// Converts the command into octets.
    ///
    /// An empty payload is sent as a single `0x00` octet with Lc = 1, so the Lc octet is always
    /// present. Le is appended only when it is non-zero.
    pub fn encode(&self) -> Result<EncodedCommand, EncodingError> {
        if self.payload.len() > MAX_PAYLOAD_LENGTH {
            return Err(EncodingError::PayloadTooLong(self.payload.len()));
        }

        if self.le > MAX_EXPECTED_LENGTH {
            return Err(EncodingError::ExpectedLengthTooLarge(self.le));
        }

        let payload: &[u8] = match self.payload.is_empty() {
            true => &EMPTY_PAYLOAD,
            _ => &self.payload,
        };

        let mut buffer = Vec::with_capacity(HEADER_LENGTH + 2 + payload.len());
        buffer.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);
        buffer.push(payload.len() as u8);
        buffer.extend_from_slice(payload);

        if self.le > 0 {
            buffer.push(self.le as u8);
        }

        Ok(EncodedCommand(buffer))
    }
}

/// Octets of an encoded command, ready to be transmitted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedCommand(Vec<u8>);

impl EncodedCommand {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AID: [u8; 8] = [0xA0, 0x00, 0x00, 0x00, 0x02, 0x02, 0x01, 0x01];

    #[test]
    fn test_encode_select() {
        let command = Command::new_with_payload(0x00, 0xA4, 0x04, 0x00, AID.to_vec());

        assert_eq!(
            hex::decode("00A4040008A000000002020101").unwrap(),
            command.encode().unwrap().into_bytes(),
        );
    }

    #[test]
    fn test_encode_empty_payload_with_le() {
        let command = Command::new_with_le(0x00, 0x08, 0x00, 0x00, 2);

        assert_eq!(
            vec![0x00, 0x08, 0x00, 0x00, 0x01, 0x00, 0x02],
            command.encode().unwrap().into_bytes(),
        );
    }

    #[test]
    fn test_encode_empty_payload_never_has_zero_lc() {
        let encoded = Command::new(0x80, 0x10, 0x01, 0x02).encode().unwrap();

        assert_eq!(&[0x80, 0x10, 0x01, 0x02, 0x01, 0x00], encoded.as_bytes());
    }

    #[test]
    fn test_encode_layout() {
        for len in [1usize, 2, 17, 128, 254, 255] {
            let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();

            for le in [0u16, 1, 20, 255] {
                let command =
                    Command::new_with_payload_le(0x00, 0x01, 0x02, 0x03, le, payload.clone());
                let bytes = command.encode().unwrap().into_bytes();

                assert_eq!(&[0x00, 0x01, 0x02, 0x03], &bytes[..4]);
                assert_eq!(len as u8, bytes[4]);
                assert_eq!(payload.as_slice(), &bytes[5..5 + len]);

                match le {
                    0 => assert_eq!(5 + len, bytes.len()),
                    _ => assert_eq!(Some(&(le as u8)), bytes.get(5 + len)),
                }
            }
        }
    }

    #[test]
    fn test_encode_is_idempotent() {
        let command =
            Command::new_with_payload_le(0x00, 0x01, 0x00, 0x00, 20, b"CHALLENGE".to_vec());

        assert_eq!(command.encode().unwrap(), command.encode().unwrap());
        assert_eq!(command.encode(), crate::apdu::encode(&command));
    }

    #[test]
    fn test_encode_rejects_long_payload() {
        let command = Command::new_with_payload(0x00, 0x01, 0x00, 0x00, vec![0xAA; 256]);

        assert_eq!(Err(EncodingError::PayloadTooLong(256)), command.encode());
    }

    #[test]
    fn test_encode_rejects_large_le() {
        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 256);

        assert_eq!(
            Err(EncodingError::ExpectedLengthTooLarge(256)),
            command.encode(),
        );
    }
}

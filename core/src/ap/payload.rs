//! Arguments of the applet are a fixed sequence of single octets and length-prefixed fields.

use crate::apdu::MAX_PAYLOAD_LENGTH;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("Field of {0} octets cannot be prefixed with a single length octet")]
    TooLong(usize),
}

/// Builds the payload of a command, field by field.
#[derive(Clone, Debug, Default)]
pub struct PayloadBuilder {
    buffer: Vec<u8>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a field as one length octet followed by the data.
    pub fn field(mut self, data: &[u8]) -> Result<Self, FieldError> {
        if data.len() > MAX_PAYLOAD_LENGTH {
            return Err(FieldError::TooLong(data.len()));
        }

        self.buffer.push(data.len() as u8);
        self.buffer.extend_from_slice(data);

        Ok(self)
    }

    /// Appends a single octet, without length prefix.
    pub fn byte(mut self, value: u8) -> Self {
        self.buffer.push(value);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_hmac_arguments() {
        let payload = PayloadBuilder::new()
            .field(b"123456")
            .unwrap()
            .byte(0)
            .field(b"CHALLENGE")
            .unwrap()
            .build();

        let mut expected = vec![6];
        expected.extend_from_slice(b"123456");
        expected.extend_from_slice(&[0, 9]);
        expected.extend_from_slice(b"CHALLENGE");

        assert_eq!(expected, payload);
    }

    #[test]
    fn test_empty_field() {
        let payload = PayloadBuilder::new().field(&[]).unwrap().build();

        assert_eq!(vec![0], payload);
    }

    #[test]
    fn test_field_too_long() {
        let result = PayloadBuilder::new().field(&[0x30; 256]);

        assert_eq!(Some(FieldError::TooLong(256)), result.err());
    }
}

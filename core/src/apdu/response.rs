use std::fmt::{Display, Formatter};

/// Status word trailing every response.
/// No meaning is attached to the value; the applet defines what counts as success.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct StatusWord {
    pub sw1: u8,
    pub sw2: u8,
}

impl StatusWord {
    pub fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Combines SW1 and SW2 into a single big-endian value, e.g. `0x9000`.
    pub fn to_u16(self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self { sw1, sw2 }
    }
}

impl Display for StatusWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// An response that was received from the card
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Response {
    body: Vec<u8>,
    trailer: StatusWord,
}

impl Response {
    pub fn new(body: Vec<u8>, sw1: u8, sw2: u8) -> Self {
        Self {
            body,
            trailer: StatusWord { sw1, sw2 },
        }
    }

    /// Parses a response from the octets, splitting off the trailing status word.
    /// Returns `None` if there are fewer than two octets.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Option<Self> {
        let sw2 = bytes.pop()?;
        let sw1 = bytes.pop()?;

        Some(Self::new(bytes, sw1, sw2))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn sw1(&self) -> u8 {
        self.trailer.sw1
    }

    pub fn sw2(&self) -> u8 {
        self.trailer.sw2
    }

    pub fn status(&self) -> StatusWord {
        self.trailer
    }

    /// Splits the response into the body, SW1 and SW2.
    pub fn into_parts(self) -> (Vec<u8>, u8, u8) {
        let Self { body, trailer } = self;

        (body, trailer.sw1, trailer.sw2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let response = Response::from_bytes(vec![0x01, 0x02, 0x90, 0x00]).unwrap();

        assert_eq!(&[0x01, 0x02], response.body());
        assert_eq!(StatusWord::new(0x90, 0x00), response.status());
        assert_eq!(0x9000, response.status().to_u16());
    }

    #[test]
    fn test_from_bytes_without_body() {
        let response = Response::from_bytes(vec![0x6A, 0x82]).unwrap();

        assert!(response.body().is_empty());
        assert_eq!((vec![], 0x6A, 0x82), response.into_parts());
    }

    #[test]
    fn test_from_bytes_too_short() {
        assert_eq!(None, Response::from_bytes(vec![0x90]));
        assert_eq!(None, Response::from_bytes(vec![]));
    }

    #[test]
    fn test_status_word_display() {
        assert_eq!("69 82", StatusWord::from((0x69, 0x82)).to_string());
    }
}

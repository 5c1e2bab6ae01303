//! Structured answers of the applet.

use crate::ap::HashMethod;

/// Length of the body answered to `GET INFO`.
pub const INFO_LENGTH: usize = 10;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Response body is {actual} octets long, expected {expected}")]
    TooShort { expected: usize, actual: usize },

    #[error("Unknown hash method: {0:#04X}")]
    UnknownHashMethod(u8),
}

/// Capabilities and identity of the applet.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Info {
    pub max_secrets: u8,
    pub max_name_length: u8,
    pub max_secret_length: u8,
    pub sha1: bool,
    pub sha256: bool,
    pub sha512: bool,
    pub serial_number: [u8; 4],
}

impl<'a> TryFrom<&'a [u8]> for Info {
    type Error = ParseError;

    fn try_from(buf: &'a [u8]) -> Result<Self, Self::Error> {
        let buf: &[u8; INFO_LENGTH] = buf
            .get(..INFO_LENGTH)
            .and_then(|b| b.try_into().ok())
            .ok_or(ParseError::TooShort {
                expected: INFO_LENGTH,
                actual: buf.len(),
            })?;

        let [max_secrets, max_name_length, max_secret_length, sha1, sha256, sha512, serial @ ..] =
            *buf;

        Ok(Self {
            max_secrets,
            max_name_length,
            max_secret_length,
            sha1: sha1 != 0,
            sha256: sha256 != 0,
            sha512: sha512 != 0,
            serial_number: serial,
        })
    }
}

/// Usage of a secret slot, as answered to `GET SECRET STATUS`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SecretStatus {
    pub used: bool,
    /// Name of the secret, decoded lossily: invalid UTF-8 is replaced with U+FFFD.
    pub name: String,
    pub method: HashMethod,
}

impl<'a> TryFrom<&'a [u8]> for SecretStatus {
    type Error = ParseError;

    fn try_from(buf: &'a [u8]) -> Result<Self, Self::Error> {
        // <USED> <NAME LEN> NAME <METHOD>
        let too_short = |expected| ParseError::TooShort {
            expected,
            actual: buf.len(),
        };

        let (&used, rest) = buf.split_first().ok_or(too_short(3))?;
        let (&name_len, rest) = rest.split_first().ok_or(too_short(3))?;
        let name_len = name_len as usize;
        let name = rest.get(..name_len).ok_or(too_short(3 + name_len))?;
        let &method = rest.get(name_len).ok_or(too_short(3 + name_len))?;

        Ok(Self {
            used: used != 0,
            name: String::from_utf8_lossy(name).to_string(),
            method: HashMethod::try_from(method)?,
        })
    }
}

//! OTP AP: keeps HMAC secrets behind a PIN and computes HMACs of challenges with them.

use std::rc::Rc;

use crate::ap::{Error, ParseError};
use crate::apdu::{Command, Response};
use crate::transport::Transport;
use crate::Session;

/// AID of the applet.
pub const AID: [u8; 8] = [0xA0, 0x00, 0x00, 0x00, 0x02, 0x02, 0x01, 0x01];

pub const CLA: u8 = 0x00;

const SELECT_P1: u8 = 0x04;
const SELECT_P2: u8 = 0x00;

// Expected length the applet has always been queried for info with.
const GET_INFO_LE: u16 = 2;

/// Instructions understood by the applet.
pub mod ins {
    pub const HMAC: u8 = 0x01;
    pub const GET_SECRET_STATUS: u8 = 0x02;
    pub const SAVE_NEW_SECRET: u8 = 0x03;
    pub const DELETE_SECRET: u8 = 0x04;
    pub const SAVE_PIN: u8 = 0x05;
    pub const UNBLOCK_PIN: u8 = 0x06;
    pub const SAVE_ADMIN_PIN: u8 = 0x07;
    pub const GET_INFO: u8 = 0x08;

    pub const SELECT: u8 = 0xA4;
}

/// Hash function a secret slot computes its HMAC with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum HashMethod {
    /// The slot holds no secret.
    None = 0x00,
    Sha1 = 0x01,
    Sha256 = 0x02,
    Sha512 = 0x03,
}

impl TryFrom<u8> for HashMethod {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use HashMethod::*;

        match value {
            0x00 => Ok(None),
            0x01 => Ok(Sha1),
            0x02 => Ok(Sha256),
            0x03 => Ok(Sha512),
            _ => Err(ParseError::UnknownHashMethod(value)),
        }
    }
}

impl From<HashMethod> for u8 {
    fn from(method: HashMethod) -> Self {
        method as u8
    }
}

/// Builders of the commands the applet understands.
pub mod commands {
    use super::*;
    use crate::ap::{FieldError, PayloadBuilder};

    fn command(ins: u8, payload: Vec<u8>) -> Command {
        Command::new_with_payload(CLA, ins, 0x00, 0x00, payload)
    }

    /// Constructs a `SELECT` command for the applet with the AID.
    pub fn select(aid: &[u8]) -> Command {
        Command::new_with_payload(CLA, ins::SELECT, SELECT_P1, SELECT_P2, aid.to_vec())
    }

    /// Constructs a `GET INFO` command.
    pub fn get_info() -> Command {
        Command::new_with_le(CLA, ins::GET_INFO, 0x00, 0x00, GET_INFO_LE)
    }

    /// Constructs a `GET SECRET STATUS` command for the secret slot.
    pub fn get_secret_status(pin: &[u8], id: u8) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new().field(pin)?.byte(id).build();

        Ok(command(ins::GET_SECRET_STATUS, payload))
    }

    /// Constructs a `SAVE NEW SECRET` command storing the secret into the slot.
    pub fn save_secret(
        pin: &[u8],
        id: u8,
        secret: &[u8],
        name: &[u8],
        method: HashMethod,
    ) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new()
            .field(pin)?
            .byte(id)
            .field(secret)?
            .field(name)?
            .byte(method.into())
            .build();

        Ok(command(ins::SAVE_NEW_SECRET, payload))
    }

    /// Constructs a `HMAC` command computing the HMAC of the challenge with the secret in the slot.
    pub fn generate_hmac(pin: &[u8], id: u8, challenge: &[u8]) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new()
            .field(pin)?
            .byte(id)
            .field(challenge)?
            .build();

        Ok(command(ins::HMAC, payload))
    }

    /// Constructs a `DELETE SECRET` command clearing the slot.
    pub fn delete_secret(pin: &[u8], id: u8) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new().field(pin)?.byte(id).build();

        Ok(command(ins::DELETE_SECRET, payload))
    }

    /// Constructs a `SAVE PIN` command.
    pub fn save_pin(old: &[u8], new: &[u8]) -> Result<Command, FieldError> {
        change_pin(ins::SAVE_PIN, old, new)
    }

    /// Constructs an `UNBLOCK PIN` command, resetting the retry counter of the PIN.
    pub fn unblock_pin(admin_pin: &[u8]) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new().field(admin_pin)?.build();

        Ok(command(ins::UNBLOCK_PIN, payload))
    }

    /// Constructs a `SAVE ADMIN PIN` command.
    pub fn save_admin_pin(old: &[u8], new: &[u8]) -> Result<Command, FieldError> {
        change_pin(ins::SAVE_ADMIN_PIN, old, new)
    }

    fn change_pin(ins: u8, old: &[u8], new: &[u8]) -> Result<Command, FieldError> {
        let payload = PayloadBuilder::new().field(old)?.field(new)?.build();

        Ok(command(ins, payload))
    }
}

/// An AP to manage the secrets on the card and compute HMACs with them.
///
/// Every method returns the response as received; interpreting the status word is up to the
/// caller.
pub struct OtpAp<T>
where
    T: Transport,
{
    session: Rc<Session<T>>,
}

impl<T> OtpAp<T>
where
    T: Transport,
{
    /// Wraps the session without selecting the applet.
    pub fn new(session: Rc<Session<T>>) -> Self {
        Self { session }
    }

    /// Opens the AP in the card by selecting the applet.
    /// The response to `SELECT` is returned alongside the AP.
    pub fn open(session: Rc<Session<T>>) -> Result<(Self, Response), Error<T::Error>> {
        let ap = Self::new(session);
        let response = ap.select()?;

        Ok((ap, response))
    }

    /// Selects the applet again.
    pub fn select(&self) -> Result<Response, Error<T::Error>> {
        self.execute(commands::select(&AID))
    }

    /// Queries the capabilities of the applet.
    /// Parse the body with [`crate::ap::Info`].
    pub fn info(&self) -> Result<Response, Error<T::Error>> {
        self.execute(commands::get_info())
    }

    /// Queries the usage of the secret slot.
    /// Parse the body with [`crate::ap::SecretStatus`].
    pub fn secret_status(&self, pin: &[u8], id: u8) -> Result<Response, Error<T::Error>> {
        self.execute(commands::get_secret_status(pin, id)?)
    }

    /// Stores the secret into the slot.
    pub fn save_secret(
        &self,
        pin: &[u8],
        id: u8,
        secret: &[u8],
        name: &[u8],
        method: HashMethod,
    ) -> Result<Response, Error<T::Error>> {
        self.execute(commands::save_secret(pin, id, secret, name, method)?)
    }

    /// Computes the HMAC of the challenge with the secret in the slot.
    pub fn hmac(&self, pin: &[u8], id: u8, challenge: &[u8]) -> Result<Response, Error<T::Error>> {
        self.execute(commands::generate_hmac(pin, id, challenge)?)
    }

    /// Clears the slot.
    pub fn delete_secret(&self, pin: &[u8], id: u8) -> Result<Response, Error<T::Error>> {
        self.execute(commands::delete_secret(pin, id)?)
    }

    /// Replaces the PIN.
    pub fn save_pin(&self, old: &[u8], new: &[u8]) -> Result<Response, Error<T::Error>> {
        self.execute(commands::save_pin(old, new)?)
    }

    /// Unblocks the PIN with the admin PIN.
    pub fn unblock_pin(&self, admin_pin: &[u8]) -> Result<Response, Error<T::Error>> {
        self.execute(commands::unblock_pin(admin_pin)?)
    }

    /// Replaces the admin PIN.
    pub fn save_admin_pin(&self, old: &[u8], new: &[u8]) -> Result<Response, Error<T::Error>> {
        self.execute(commands::save_admin_pin(old, new)?)
    }

    fn execute(&self, command: Command) -> Result<Response, Error<T::Error>> {
        Ok(self.session.execute(&command)?)
    }
}

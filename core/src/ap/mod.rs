//! The OTP applet and the arguments and answers it understands

pub mod otp;
pub mod payload;
pub mod status;

pub use self::otp::{HashMethod, OtpAp};
pub use self::payload::{FieldError, PayloadBuilder};
pub use self::status::{Info, ParseError, SecretStatus};

use crate::session;

/// Errors raised while talking to the applet.
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    #[error("Could not build the arguments: {0}")]
    Field(#[from] FieldError),

    #[error(transparent)]
    Session(#[from] session::Error<E>),
}

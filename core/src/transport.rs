//! Carrying encoded commands to the card.

use crate::apdu::Response;

/// A connection to the card, opened and owned outside of this crate.
pub trait Transport {
    /// Failure raised by the connection itself, e.g. a lost reader or a timeout.
    type Error: std::error::Error + 'static;

    /// Transmits the encoded command to the card, then receives the response from them.
    /// Implementations must fail explicitly when the connection is gone.
    fn transmit(&self, command: &[u8]) -> Result<Response, Self::Error>;
}

impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    type Error = T::Error;

    fn transmit(&self, command: &[u8]) -> Result<Response, Self::Error> {
        (**self).transmit(command)
    }
}

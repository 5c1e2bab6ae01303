//! Sending a command and receiving its response in one call.

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::apdu::{Command, EncodingError, Response};
use crate::transport::Transport;

#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    #[error("Could not encode the command: {0}")]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Transport(E),
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// An adapter to communicate with the card through the transport
#[derive(Debug)]
pub struct Session<T>
where
    T: Transport,
{
    transport: T,
}

impl<T> Session<T>
where
    T: Transport,
{
    /// Initiates a session over the transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends the command and returns the response as received.
    pub fn execute(&self, command: &Command) -> Result<Response, T::Error> {
        execute(&self.transport, command)
    }
}

/// Encodes the command, transmits it once and returns the response untouched.
///
/// The status word is not interpreted, and a failing transport is never retried.
/// Nothing is transmitted if the command cannot be encoded.
pub fn execute<T>(transport: &T, command: &Command) -> Result<Response, T::Error>
where
    T: Transport + ?Sized,
{
    let tx = command.encode()?;
    debug!("TX: {}", hex::encode(tx.as_bytes()));

    let response = transport.transmit(tx.as_bytes()).map_err(Error::Transport)?;

    debug!("RX: {}", hex::encode(response.body()));
    debug!("SW: {}", response.status());

    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("card removed")]
    struct Removed;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<Vec<u8>>>,
        removed: Cell<bool>,
    }

    impl Transport for Recorder {
        type Error = Removed;

        fn transmit(&self, command: &[u8]) -> std::result::Result<Response, Removed> {
            self.sent.borrow_mut().push(command.to_vec());

            match self.removed.get() {
                true => Err(Removed),
                _ => Ok(Response::new(vec![0xDE, 0xAD], 0x6A, 0x88)),
            }
        }
    }

    #[test]
    fn test_execute_returns_response_untouched() {
        let session = Session::new(Recorder::default());
        let command = Command::new_with_le(0x00, 0x08, 0x00, 0x00, 2);

        let response = session.execute(&command).unwrap();

        assert_eq!((vec![0xDE, 0xAD], 0x6A, 0x88), response.into_parts());
        assert_eq!(
            vec![vec![0x00, 0x08, 0x00, 0x00, 0x01, 0x00, 0x02]],
            *session.transport().sent.borrow(),
        );
    }

    #[test]
    fn test_execute_does_not_transmit_unencodable_command() {
        let recorder = Recorder::default();
        let command = Command::new_with_payload(0x00, 0x01, 0x00, 0x00, vec![0; 300]);

        let result = execute(&recorder, &command);

        assert!(matches!(result, Err(Error::Encoding(EncodingError::PayloadTooLong(300)))));
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn test_execute_surfaces_transport_error_without_retry() {
        let recorder = Recorder::default();
        recorder.removed.set(true);

        let session = Session::new(&recorder);
        let result = session.execute(&Command::new(0x00, 0xA4, 0x04, 0x00));

        assert!(matches!(result, Err(Error::Transport(Removed))));
        assert_eq!(1, recorder.sent.borrow().len());
    }
}

//! Cards reached through PC/SC, enabled by the `pcsc` feature.
//!
//! PC/SC is the reader service shipped with Windows and macOS, and provided by pcsc-lite on
//! Linux. A [`Device`] found through the [`Context`] waits for a card, and the connected
//! [`PcscCard`] is a [`Transport`] a [`crate::Session`] can run over.
//!
//! ## Usage
//! ```rust,no_run
//! use std::rc::Rc;
//!
//! use otpcard::ap::OtpAp;
//! use otpcard::pcsc::Context;
//! use otpcard::Session;
//!
//! let ctx = Context::try_new().unwrap();
//! let device = ctx.open(0).unwrap();
//! let card = device.connect(&ctx).unwrap();
//!
//! let session = Rc::new(Session::new(card));
//! let (otp_ap, _select) = OtpAp::open(Rc::clone(&session)).unwrap();
//! let info = otp_ap.info().unwrap();
//! ```

use std::ffi::{CStr, CString};
use std::thread::sleep;
use std::time::Duration;

use pcsc::{Card, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::apdu::Response;
use crate::transport::Transport;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error occurred while communicating with PC/SC: {0}")]
    PcscError(#[from] pcsc::Error),

    #[error("Reader #{0} not found on PC/SC service")]
    ReaderNotFound(usize),

    #[error("The card answered {0} octets, too short to hold a status word")]
    ResponseTooShort(usize),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// PC/SC context.
pub struct Context {
    ctx: pcsc::Context,
}

impl Context {
    /// Creates a PC/SC context in user scope.
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            ctx: pcsc::Context::establish(Scope::User)?,
        })
    }

    /// Lists the names of the readers known to the PC/SC service.
    pub fn readers(&self) -> Result<Vec<String>> {
        let mut buf = [0u8; 2048];

        Ok(self
            .ctx
            .list_readers(&mut buf)?
            .map(|reader| reader.to_string_lossy().into_owned())
            .collect())
    }

    /// Finds the PC/SC device at the index in the reader list.
    pub fn open(&self, index: usize) -> Result<Device> {
        let mut buf = [0u8; 2048];

        Ok(Device::new(
            self.ctx
                .list_readers(&mut buf)?
                .nth(index)
                .ok_or(Error::ReaderNotFound(index))?,
        ))
    }
}

/// PC/SC device handle.
pub struct Device {
    reader: CString,
}

impl Device {
    fn new(reader: &CStr) -> Self {
        debug!("Using device: {}", reader.to_str().unwrap_or_default());

        Self {
            reader: reader.to_owned(),
        }
    }

    /// Name of the reader.
    pub fn name(&self) -> String {
        self.reader.to_string_lossy().into_owned()
    }

    /// Connects to the card inserted to the device after waiting them.
    pub fn connect(&self, ctx: &Context) -> Result<PcscCard> {
        // Waits for touching card, polling for each seconds.
        debug!("Waiting for a card");

        loop {
            match ctx
                .ctx
                .connect(&self.reader, ShareMode::Shared, Protocols::ANY)
            {
                Ok(card) => {
                    debug!("Connected to your card");

                    return Ok(PcscCard::new(card));
                }
                Err(pcsc::Error::NoSmartcard) => {
                    info!("Still waiting for your card...");
                    sleep(Duration::from_secs(1));
                }
                Err(e) => return Err(Error::PcscError(e)),
            }
        }
    }
}

/// A card to be communicated through PC/SC.
pub struct PcscCard {
    card: Card,
}

impl PcscCard {
    fn new(card: Card) -> Self {
        Self { card }
    }
}

impl Transport for PcscCard {
    type Error = Error;

    /// Transmits an APDU command to the card, then receives a response from them.
    fn transmit(&self, tx: &[u8]) -> Result<Response> {
        let mut rx = [0u8; MAX_BUFFER_SIZE];
        let rx = self.card.transmit(tx, &mut rx)?;

        Response::from_bytes(Vec::from(rx)).ok_or(Error::ResponseTooShort(rx.len()))
    }
}

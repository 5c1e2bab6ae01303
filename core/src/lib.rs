//! A crate to talk to the OTP card applet through an APDU transport.
//!
//! The [`apdu`] codec and the [`Session`] are transport-agnostic: anything implementing
//! [`Transport`] can carry the commands. PC/SC readers are supported out of the box behind the
//! `pcsc` feature.

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($t: tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! info {
    ($($t: tt)*) => {};
}

#[cfg(feature = "pcsc")]
pub mod pcsc;

pub mod ap;
pub mod apdu;
pub mod session;
pub mod transport;
pub mod verifier;

pub use session::Session;
pub use transport::Transport;

//! Local HMAC-SHA1 reference to check the answers of the card against.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Length of a HMAC-SHA1 digest in octets.
pub const DIGEST_LENGTH: usize = 20;

/// Computes HMAC-SHA1 of the message, returning the raw digest.
pub fn compute_reference_hmac(key: &[u8], message: &[u8]) -> Vec<u8> {
    new_mac(key, message).finalize().into_bytes().to_vec()
}

/// Determines whether the body returned by the card is the HMAC-SHA1 of the message.
pub fn verify_response(key: &[u8], message: &[u8], body: &[u8]) -> bool {
    new_mac(key, message).verify_slice(body).is_ok()
}

fn new_mac(key: &[u8], message: &[u8]) -> HmacSha1 {
    // Keys longer than a block are hashed first, so no length is rejected.
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    mac
}

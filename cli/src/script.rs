//! The command sequence run against the card.

use std::fmt::Debug;
use std::rc::Rc;

use dialoguer::Password;
use serde::Serialize;
use tracing::{info, warn};

use otpcard::ap::{HashMethod, Info, OtpAp, ParseError, SecretStatus};
use otpcard::apdu::Response;
use otpcard::pcsc;
use otpcard::verifier::{compute_reference_hmac, verify_response};
use otpcard::{Session, Transport};

use crate::{Cli, Result};

/// Runs the sequence, returning whether the card answered the expected HMAC.
pub(crate) fn run<T>(cli: &Cli, card: T) -> Result<bool>
where
    T: Transport<Error = pcsc::Error>,
{
    let session = Rc::new(Session::new(card));

    let (otp_ap, select) = OtpAp::open(Rc::clone(&session))?;
    report("SELECT", &select);

    let response = otp_ap.info()?;
    report("GET INFO", &response);
    print_decoded::<Info>(cli, response.body())?;

    let pin = match &cli.pin {
        Some(pin) => pin.clone(),
        None => Password::new().with_prompt("PIN").interact()?,
    };
    let pin = pin.as_bytes();

    let response = otp_ap.secret_status(pin, cli.secret_id)?;
    report("GET SECRET STATUS", &response);
    print_decoded::<SecretStatus>(cli, response.body())?;

    if cli.save_secret {
        let response = otp_ap.save_secret(
            pin,
            cli.secret_id,
            cli.secret.as_bytes(),
            cli.name.as_bytes(),
            HashMethod::Sha1,
        )?;
        report("SAVE NEW SECRET", &response);
    }

    let response = otp_ap.hmac(pin, cli.secret_id, cli.challenge.as_bytes())?;
    report("HMAC", &response);

    let secret = cli.secret.as_bytes();
    let challenge = cli.challenge.as_bytes();
    let expected = compute_reference_hmac(secret, challenge);

    println!("Received: {}", hex::encode_upper(response.body()));
    println!("Expected: {}", hex::encode_upper(&expected));

    let matched = verify_response(secret, challenge, response.body());
    match matched {
        true => println!("HMAC matches"),
        _ => println!("HMAC does NOT match"),
    }

    Ok(matched)
}

fn report(name: &str, response: &Response) {
    info!("{}: SW {}", name, response.status());
}

fn print_decoded<D>(cli: &Cli, body: &[u8]) -> Result<()>
where
    D: for<'a> TryFrom<&'a [u8], Error = ParseError> + Serialize + Debug,
{
    match D::try_from(body) {
        Ok(decoded) if cli.json => println!("{}", serde_json::to_string_pretty(&decoded)?),
        Ok(decoded) => println!("{:#?}", decoded),
        Err(e) => warn!("Could not decode the answer: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use clap::Parser;

    use super::*;

    /// Answers every command with 90 00, and the HMAC command with the given body.
    struct Card {
        hmac: Vec<u8>,
        sent: RefCell<Vec<u8>>,
    }

    impl Card {
        fn new(hmac: Vec<u8>) -> Self {
            Self {
                hmac,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Card {
        type Error = pcsc::Error;

        fn transmit(&self, command: &[u8]) -> std::result::Result<Response, pcsc::Error> {
            self.sent.borrow_mut().push(command[1]);

            let body = match command[1] {
                0x01 => self.hmac.clone(),
                _ => vec![],
            };

            Ok(Response::new(body, 0x90, 0x00))
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(["otpcard", "--pin", "123456"].iter().chain(args))
    }

    #[test]
    fn test_run_matching_hmac() {
        let card = Card::new(compute_reference_hmac(b"SECRET", b"CHALLENGE"));

        assert!(run(&cli(&[]), &card).unwrap());
        assert_eq!(vec![0xA4, 0x08, 0x02, 0x01], *card.sent.borrow());
    }

    #[test]
    fn test_run_mismatching_hmac() {
        let card = Card::new(vec![0x00; 20]);

        assert!(!run(&cli(&[]), &card).unwrap());
    }

    #[test]
    fn test_run_saving_secret() {
        let card = Card::new(compute_reference_hmac(b"OTHER", b"CHALLENGE"));

        assert!(run(&cli(&["--save-secret", "--secret", "OTHER"]), &card).unwrap());
        assert_eq!(vec![0xA4, 0x08, 0x02, 0x03, 0x01], *card.sent.borrow());
    }
}

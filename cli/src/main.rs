mod script;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use otpcard::pcsc::{self, Context};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Error occurred while communicating with PC/SC: {0}")]
    Pcsc(#[from] pcsc::Error),

    #[error("Error occurred while talking to the applet: {0}")]
    Applet(#[from] otpcard::ap::Error<pcsc::Error>),

    #[error("Could not read the PIN: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("Could not serialise the answer: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Exercises the OTP applet on a card: selects it, queries its info and the secret status,
/// then asks the card for a HMAC and checks it against a locally computed one.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub(crate) struct Cli {
    /// Index of the reader to use, in the order listed by PC/SC
    #[arg(short, long, default_value_t = 0)]
    reader: usize,

    /// PIN unlocking the secrets; prompted for when omitted
    #[arg(short, long)]
    pin: Option<String>,

    /// Slot of the secret to use
    #[arg(long, default_value_t = 0)]
    secret_id: u8,

    /// Secret expected in the slot, used to compute the reference HMAC
    #[arg(long, default_value = "SECRET")]
    secret: String,

    /// Name stored alongside the secret by --save-secret
    #[arg(long, default_value = "NAME")]
    name: String,

    /// Challenge to compute the HMAC of
    #[arg(long, default_value = "CHALLENGE")]
    challenge: String,

    /// Stores the secret into the slot before asking for the HMAC
    #[arg(long)]
    save_secret: bool,

    /// Prints the decoded answers as JSON
    #[arg(long)]
    json: bool,

    /// Traces every APDU exchanged with the card
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(match cli.verbose {
                true => "debug",
                _ => "info",
            })
        }))
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::try_new()?;
    for (i, reader) in ctx.readers()?.iter().enumerate() {
        tracing::debug!("Reader #{}: {}", i, reader);
    }

    let device = ctx.open(cli.reader)?;
    tracing::info!("Using reader: {}", device.name());

    let card = device.connect(&ctx)?;

    Ok(match script::run(&cli, card)? {
        true => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

use anyhow::{anyhow, Context, Result};
use std::env;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use termion::input::TermRead;

use otp_guard::{Authenticator, KeyFileStore, OtpConfig, SystemClock};

const PASSWORD_ENV: &str = "OTP_GUARD_PASSWORD";

pub type KeyFileAuthenticator = Authenticator<KeyFileStore, SystemClock>;

/// Asks for the database password (or takes it from `OTP_GUARD_PASSWORD`)
/// and opens the key file behind an authenticator.
pub fn open_authenticator(key_file: &PathBuf, config: OtpConfig) -> Result<KeyFileAuthenticator> {
    let password = match env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => read_hidden("Enter database password: ")?,
    };

    let store = KeyFileStore::open(key_file, password.as_str(), config.clone())
        .with_context(|| format!("Failed to open key file {}", key_file.display()))?;

    Ok(Authenticator::new(config, store, SystemClock)?)
}

pub fn read_hidden(prompt: &str) -> Result<String> {
    let stdout = stdout();
    let mut stdout = stdout.lock();
    let stdin = stdin();
    let mut stdin = stdin.lock();

    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;
    let value = stdin
        .read_passwd(&mut stdout)?
        .ok_or(anyhow!("No input received"))?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;

    Ok(value)
}

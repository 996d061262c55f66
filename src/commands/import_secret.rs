use anyhow::Result;
use std::path::PathBuf;

use otp_guard::OtpConfig;

use super::{open_authenticator, read_hidden};

pub fn import_secret(
    key_file: &PathBuf,
    config: OtpConfig,
    user: &str,
    secret: Option<&str>,
) -> Result<()> {
    let authenticator = open_authenticator(key_file, config)?;

    let secret = match secret {
        Some(secret) => secret.to_owned(),
        None => read_hidden("Enter Base32 secret: ")?,
    };

    authenticator.enroll_existing(user, secret.trim())?;

    println!("Database saved");
    Ok(())
}

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use otp_guard::OtpConfig;

use super::open_authenticator;

pub fn revoke(key_file: &PathBuf, config: OtpConfig, user: &str) -> Result<()> {
    let authenticator = open_authenticator(key_file, config)?;

    if !authenticator.revoke(user)? {
        Err(anyhow!("User {} not found in file", user))?;
    }

    println!("Database saved");
    Ok(())
}

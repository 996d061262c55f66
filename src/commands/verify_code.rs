use anyhow::Result;
use std::path::PathBuf;

use otp_guard::OtpConfig;

use super::open_authenticator;

pub fn verify_code(key_file: &PathBuf, config: OtpConfig, user: &str, code: &str) -> Result<bool> {
    let authenticator = open_authenticator(key_file, config)?;
    let valid = authenticator.verify(user, code)?;

    println!("{}", if valid { "valid" } else { "invalid" });
    Ok(valid)
}

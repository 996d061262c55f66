use anyhow::{anyhow, Result};
use std::path::PathBuf;

use otp_guard::OtpConfig;

use super::open_authenticator;

pub fn show_code(key_file: &PathBuf, config: OtpConfig, user: &str) -> Result<()> {
    let authenticator = open_authenticator(key_file, config)?;

    let account = authenticator
        .store()
        .account(user)?
        .ok_or(anyhow!("User {} not found in file", user))?;
    let (code, ttl) = authenticator
        .current_code(user)?
        .ok_or(anyhow!("User {} not found in file", user))?;

    println!(
        "{}:{} ({}, {} digits, {}s, enrolled at {})",
        account.issuer,
        account.label,
        account.parameters.algorithm.as_str(),
        account.parameters.digits,
        account.parameters.period,
        account.created_at
    );
    println!("code: {} ttl: {}", code, ttl);
    Ok(())
}

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use otp_guard::OtpConfig;

use super::open_authenticator;

pub fn provision(
    key_file: &PathBuf,
    config: OtpConfig,
    user: &str,
    svg_file: Option<&PathBuf>,
    as_json: bool,
) -> Result<()> {
    let authenticator = open_authenticator(key_file, config)?;
    let payload = authenticator.provision(user)?;

    if let Some(svg_file) = svg_file {
        fs::write(svg_file, payload.qr_svg()?)
            .with_context(|| format!("Failed to write {}", svg_file.display()))?;
    }

    if as_json {
        let output = json!({
            "user": user,
            "secret": payload.secret.to_base32(),
            "uri": payload.uri,
            "qr_svg": payload.qr_svg_data_uri()?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", payload.qr_terminal()?);
    println!("user: {}", user);
    println!("secret: {}", payload.secret.to_base32());
    println!("uri: {}", payload.uri);
    Ok(())
}

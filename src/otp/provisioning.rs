use rand_core::{OsRng, RngCore};
use tracing::debug;

use crate::{
    config::{OtpConfig, DEFAULT_DIGITS, DEFAULT_STEP},
    enums::OtpAlgorithm,
    error::{OtpError, Result},
    types::Secret,
};

use super::qr;

/// What an authenticator app needs to enroll: the secret and the
/// `otpauth://` URI that carries it.
#[derive(Debug, Clone)]
pub struct ProvisioningPayload {
    pub secret: Secret,
    pub uri: String,
}

impl ProvisioningPayload {
    pub fn qr_terminal(&self) -> Result<String> {
        qr::render_terminal(&self.uri)
    }

    pub fn qr_svg(&self) -> Result<String> {
        qr::render_svg(&self.uri)
    }

    pub fn qr_svg_data_uri(&self) -> Result<String> {
        qr::render_svg_data_uri(&self.uri)
    }
}

/// Fills `byte_length` bytes from the operating system CSPRNG.
pub fn generate_secret(byte_length: usize) -> Result<Secret> {
    let mut bytes = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| OtpError::Random(err.to_string()))?;
    Ok(Secret::new(bytes))
}

/// `otpauth://totp/{issuer}:{label}?secret={base32}&issuer={issuer}`
pub fn build_provisioning_uri(account_label: &str, issuer: &str, secret: &Secret) -> String {
    let issuer = urlencoding::encode(issuer);
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}",
        issuer,
        urlencoding::encode(account_label),
        secret.to_base32(),
        issuer
    )
}

#[derive(Debug, Clone)]
pub struct ProvisioningService {
    config: OtpConfig,
}

impl ProvisioningService {
    pub fn new(config: OtpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    pub fn generate_secret(&self) -> Result<Secret> {
        generate_secret(self.config.secret_length)
    }

    /// Builds the URI under the configured issuer. Non-default parameters
    /// are appended so apps do not fall back to SHA1/6/30.
    pub fn provisioning_uri(&self, account_label: &str, secret: &Secret) -> String {
        let mut uri = build_provisioning_uri(account_label, &self.config.issuer, secret);
        if self.config.algorithm != OtpAlgorithm::Sha1 {
            uri.push_str("&algorithm=");
            uri.push_str(self.config.algorithm.as_str());
        }
        if self.config.digits != DEFAULT_DIGITS {
            uri.push_str(&format!("&digits={}", self.config.digits));
        }
        if self.config.step != DEFAULT_STEP {
            uri.push_str(&format!("&period={}", self.config.step));
        }
        uri
    }

    pub fn provision(&self, account_label: &str) -> Result<ProvisioningPayload> {
        let secret = self.generate_secret()?;
        let uri = self.provisioning_uri(account_label, &secret);
        debug!(
            account = account_label,
            issuer = %self.config.issuer,
            "generated provisioning payload"
        );
        Ok(ProvisioningPayload { secret, uri })
    }
}

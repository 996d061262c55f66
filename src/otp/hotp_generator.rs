use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::{
    config::DEFAULT_DIGITS,
    enums::OtpAlgorithm,
    error::{OtpError, Result},
};

/// RFC 4226 code derivation: HMAC over the big-endian counter followed by
/// dynamic truncation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HotpGenerator {
    algorithm: OtpAlgorithm,
    digits: u32,
}

impl Default for HotpGenerator {
    fn default() -> Self {
        Self::new(OtpAlgorithm::Sha1, DEFAULT_DIGITS)
    }
}

impl HotpGenerator {
    pub fn new(algorithm: OtpAlgorithm, digits: u32) -> Self {
        Self { algorithm, digits }
    }

    pub fn algorithm(&self) -> OtpAlgorithm {
        self.algorithm
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Numeric code for `counter`, in `0..10^digits`.
    pub fn generate(&self, secret: &[u8], counter: u64) -> Result<u32> {
        let hash = hmac_digest(self.algorithm, secret, &counter.to_be_bytes())?;
        let truncated = truncate(&hash) as u64;
        let code = 10u64
            .checked_pow(self.digits)
            .map_or(truncated, |modulus| truncated % modulus);
        Ok(code as u32)
    }

    /// Zero-padded form of [`HotpGenerator::generate`].
    pub fn generate_code(&self, secret: &[u8], counter: u64) -> Result<String> {
        let code = self.generate(secret, counter)?;
        Ok(self.format_code(code))
    }

    pub fn format_code(&self, code: u32) -> String {
        format!("{:0width$}", code, width = self.digits as usize)
    }
}

fn hmac_digest(algorithm: OtpAlgorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        OtpAlgorithm::Sha1 => mac::<Hmac<Sha1>>(algorithm, key, message),
        OtpAlgorithm::Sha256 => mac::<Hmac<Sha256>>(algorithm, key, message),
        OtpAlgorithm::Sha512 => mac::<Hmac<Sha512>>(algorithm, key, message),
    }
}

fn mac<M>(algorithm: OtpAlgorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|err| {
        OtpError::UnsupportedAlgorithm(format!("HMAC-{}: {}", algorithm.as_str(), err))
    })?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

// The low nibble of the last byte picks a 4-byte window; its top bit is
// dropped so the result reads the same signed or unsigned.
fn truncate(hash: &[u8]) -> u32 {
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    ((hash[offset] as u32 & 0x7f) << 24)
        | ((hash[offset + 1] as u32) << 16)
        | ((hash[offset + 2] as u32) << 8)
        | (hash[offset + 3] as u32)
}

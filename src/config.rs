use serde::{Deserialize, Serialize};
use std::{fs, num::NonZeroU64, path::Path};

use crate::{
    enums::OtpAlgorithm,
    error::{OtpError, Result},
    types::OtpParameters,
};

pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_STEP: u64 = 30;
pub const DEFAULT_WINDOW: u32 = 3;
pub const DEFAULT_SECRET_LENGTH: usize = 10;

const MAX_WINDOW: u32 = 10;
const MIN_SECRET_LENGTH: usize = 10;
const MAX_SECRET_LENGTH: usize = 64;

/// Settings shared by provisioning and verification. Both ends of an
/// enrollment must agree on `algorithm`, `digits` and `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Issuer shown by authenticator apps.
    pub issuer: String,
    pub algorithm: OtpAlgorithm,
    pub digits: u32,
    /// Time step in seconds.
    pub step: u64,
    /// Number of adjacent steps accepted on each side of the current one.
    pub window: u32,
    /// Length in bytes of freshly generated secrets.
    pub secret_length: usize,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            issuer: "otp-guard".to_string(),
            algorithm: OtpAlgorithm::Sha1,
            digits: DEFAULT_DIGITS,
            step: DEFAULT_STEP,
            window: DEFAULT_WINDOW,
            secret_length: DEFAULT_SECRET_LENGTH,
        }
    }
}

impl OtpConfig {
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    pub fn window(mut self, window: u32) -> Self {
        self.window = window;
        self
    }

    pub fn step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    pub fn digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }

    pub fn algorithm(mut self, algorithm: OtpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn secret_length(mut self, secret_length: usize) -> Self {
        self.secret_length = secret_length;
        self
    }

    /// Overrides algorithm, digits and step, keeping issuer and window.
    pub fn parameters(self, parameters: OtpParameters) -> Self {
        self.algorithm(parameters.algorithm)
            .digits(parameters.digits)
            .step(parameters.period)
    }

    pub fn otp_parameters(&self) -> OtpParameters {
        OtpParameters {
            algorithm: self.algorithm,
            digits: self.digits,
            period: self.step,
        }
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: OtpConfig =
            toml::from_str(data).map_err(|err| OtpError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(data.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.issuer.trim().is_empty() {
            return Err(OtpError::InvalidConfig("issuer must not be empty".into()));
        }
        if self.issuer.contains(':') {
            return Err(OtpError::InvalidConfig(
                "issuer must not contain ':'".into(),
            ));
        }
        if !(6..=8).contains(&self.digits) {
            return Err(OtpError::InvalidConfig(format!(
                "digits must be between 6 and 8, got {}",
                self.digits
            )));
        }
        if self.step == 0 {
            return Err(OtpError::InvalidConfig("step must be positive".into()));
        }
        if self.window > MAX_WINDOW {
            return Err(OtpError::InvalidConfig(format!(
                "window must be at most {}, got {}",
                MAX_WINDOW, self.window
            )));
        }
        if !(MIN_SECRET_LENGTH..=MAX_SECRET_LENGTH).contains(&self.secret_length) {
            return Err(OtpError::InvalidConfig(format!(
                "secret_length must be between {} and {} bytes, got {}",
                MIN_SECRET_LENGTH, MAX_SECRET_LENGTH, self.secret_length
            )));
        }
        Ok(())
    }

    pub fn time_step(&self) -> Result<NonZeroU64> {
        NonZeroU64::new(self.step)
            .ok_or_else(|| OtpError::InvalidConfig("step must be positive".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_authenticator_apps() {
        let config = OtpConfig::default();
        assert_eq!(config.algorithm, OtpAlgorithm::Sha1);
        assert_eq!(config.digits, 6);
        assert_eq!(config.step, 30);
        assert_eq!(config.window, 3);
        assert_eq!(config.secret_length, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = OtpConfig::from_toml_str(
            r#"
            issuer = "Intranet"
            window = 1
            algorithm = "SHA256"
            "#,
        )
        .unwrap();

        assert_eq!(config.issuer, "Intranet");
        assert_eq!(config.window, 1);
        assert_eq!(config.algorithm, OtpAlgorithm::Sha256);
        assert_eq!(config.step, 30);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(OtpConfig::default().digits(5).validate().is_err());
        assert!(OtpConfig::default().digits(9).validate().is_err());
        assert!(OtpConfig::default().step(0).validate().is_err());
        assert!(OtpConfig::default().window(11).validate().is_err());
        assert!(OtpConfig::default().secret_length(4).validate().is_err());
        assert!(OtpConfig::new("a:b").validate().is_err());
        assert!(OtpConfig::new("  ").validate().is_err());
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let err = OtpConfig::from_toml_str(r#"algorithm = "MD5""#).unwrap_err();
        assert!(matches!(err, OtpError::InvalidConfig(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("otp.toml");
        fs::write(&path, "issuer = \"Files\"\nstep = 60\n").unwrap();

        let config = OtpConfig::load(&path).unwrap();
        assert_eq!(config.issuer, "Files");
        assert_eq!(config.time_step().unwrap().get(), 60);
    }
}

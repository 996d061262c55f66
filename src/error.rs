use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtpError {
    /// Stored or supplied secret is not valid Base32.
    #[error("invalid secret format: {0}")]
    InvalidSecretFormat(String),
    /// The HMAC primitive could not be initialized.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("secure random source unavailable: {0}")]
    Random(String),
    #[error("failed to render QR code: {0}")]
    QrCode(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("account store error: {0}")]
    Store(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OtpError>;

use data_encoding::{BASE32, BASE32_NOPAD};

use crate::error::{OtpError, Result};

/// Uppercase RFC 4648 Base32 without padding.
pub fn encode(raw: &[u8]) -> String {
    BASE32_NOPAD.encode(raw)
}

/// Decodes Base32 in either case. Padded input must carry exactly the padding
/// RFC 4648 prescribes for its length.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    if encoded.is_empty() {
        return Err(OtpError::InvalidSecretFormat("secret is empty".into()));
    }

    let normalized = encoded.to_ascii_uppercase();
    let codec = match normalized.contains('=') {
        true => &BASE32,
        false => &BASE32_NOPAD,
    };

    codec
        .decode(normalized.as_bytes())
        .map_err(|err| OtpError::InvalidSecretFormat(err.to_string()))
}

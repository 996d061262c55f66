use std::fmt;
use zeroize::Zeroize;

use crate::{error::Result, otp::secret_codec};

/// Raw shared secret of a single enrollment.
///
/// Its only textual form is unpadded uppercase Base32. The bytes are wiped
/// when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    bytes: Vec<u8>,
}

impl Secret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_base32(encoded: &str) -> Result<Self> {
        secret_codec::decode(encoded).map(Self::new)
    }

    pub fn to_base32(&self) -> String {
        secret_codec::encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

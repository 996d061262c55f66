use serde::{Deserialize, Serialize};

use crate::enums::OtpAlgorithm;

/// One enrolled user inside a key file. `key` holds the 24-byte nonce
/// followed by the encrypted secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub algorithm: OtpAlgorithm,
    pub digits: u32,
    pub period: u64,
    pub issuer: String,
    pub label: String,
    pub created_at: i64,
    pub key: Vec<u8>,
}

impl Account {
    pub fn parameters(&self) -> OtpParameters {
        OtpParameters {
            algorithm: self.algorithm,
            digits: self.digits,
            period: self.period,
        }
    }

    pub fn summary(&self, user_id: &str) -> AccountSummary {
        AccountSummary {
            user: user_id.to_owned(),
            issuer: self.issuer.clone(),
            label: self.label.clone(),
            created_at: self.created_at,
            parameters: self.parameters(),
        }
    }
}

/// Code generation settings a secret was enrolled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OtpParameters {
    pub algorithm: OtpAlgorithm,
    pub digits: u32,
    pub period: u64,
}

/// Everything known about an enrolled account except its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub user: String,
    pub issuer: String,
    pub label: String,
    pub created_at: i64,
    #[serde(flatten)]
    pub parameters: OtpParameters,
}

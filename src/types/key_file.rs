use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Account;

/// On-disk layout of the encrypted account store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFile {
    pub master_key_salt: Vec<u8>,
    pub accounts: BTreeMap<String, Account>,
}

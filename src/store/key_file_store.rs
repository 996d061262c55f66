use argon2::Argon2;
use chacha20poly1305::{
    aead::{Aead, OsRng},
    AeadCore, KeyInit, XChaCha20Poly1305, XNonce,
};
use rand_core::RngCore;
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    config::OtpConfig,
    error::{OtpError, Result},
    otp::{Clock, SystemClock},
    types::{Account, AccountSummary, KeyFile, OtpParameters, Secret},
};

use super::AccountStore;

const SALT_LENGTH: usize = 32;
const NONCE_LENGTH: usize = 24;

/// Account store backed by a TOML key file. Each secret is sealed with
/// XChaCha20-Poly1305 under a key derived from the password with Argon2.
pub struct KeyFileStore {
    path: PathBuf,
    cipher: XChaCha20Poly1305,
    config: OtpConfig,
    lock: Mutex<()>,
}

impl KeyFileStore {
    /// Opens `path`, creating an empty key file with a fresh salt if it does
    /// not exist yet. A wrong password is detected here whenever the file
    /// already holds an account.
    pub fn open(path: &Path, password: &str, config: OtpConfig) -> Result<Self> {
        let key_file = match path.exists() {
            true => read_key_file(path)?,
            false => {
                let mut salt = [0u8; SALT_LENGTH];
                OsRng
                    .try_fill_bytes(&mut salt)
                    .map_err(|err| OtpError::Random(err.to_string()))?;

                let key_file = KeyFile {
                    master_key_salt: salt.to_vec(),
                    accounts: BTreeMap::new(),
                };
                write_key_file(path, &key_file)?;
                debug!(path = %path.display(), "created key file");
                key_file
            }
        };

        let mut encryption_key = [0u8; 32];
        Argon2::default()
            .hash_password_into(
                password.as_bytes(),
                key_file.master_key_salt.as_slice(),
                &mut encryption_key,
            )
            .map_err(|err| OtpError::Store(format!("failed to derive key: {}", err)))?;

        let cipher = XChaCha20Poly1305::new_from_slice(encryption_key.as_slice())
            .map_err(|err| OtpError::Store(format!("invalid key length: {}", err)))?;

        let store = Self {
            path: path.to_path_buf(),
            cipher,
            config,
            lock: Mutex::new(()),
        };

        if let Some((user_id, account)) = key_file.accounts.iter().next() {
            store.decrypt(user_id, account)?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enrolled user ids in sorted order.
    pub fn users(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(read_key_file(&self.path)?.accounts.into_keys().collect())
    }

    pub fn accounts(&self) -> Result<Vec<AccountSummary>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let key_file = read_key_file(&self.path)?;
        Ok(key_file
            .accounts
            .iter()
            .map(|(user_id, account)| account.summary(user_id))
            .collect())
    }

    pub fn account(&self, user_id: &str) -> Result<Option<AccountSummary>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let key_file = read_key_file(&self.path)?;
        Ok(key_file
            .accounts
            .get(user_id)
            .map(|account| account.summary(user_id)))
    }

    fn encrypt(&self, secret: &Secret) -> Result<Vec<u8>> {
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let mut sealed = self
            .cipher
            .encrypt(&nonce, secret.as_bytes())
            .map_err(|err| OtpError::Store(format!("failed to encrypt secret: {}", err)))?;

        let mut key = Vec::with_capacity(NONCE_LENGTH + sealed.len());
        key.extend_from_slice(nonce.as_slice());
        key.append(&mut sealed);
        Ok(key)
    }

    fn decrypt(&self, user_id: &str, account: &Account) -> Result<Secret> {
        if account.key.len() <= NONCE_LENGTH {
            return Err(OtpError::Store(format!(
                "stored key for {} is truncated",
                user_id
            )));
        }

        let (nonce, sealed) = account.key.split_at(NONCE_LENGTH);
        self.cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map(Secret::new)
            .map_err(|_| {
                OtpError::Store(format!(
                    "failed to decrypt secret for {} (wrong password?)",
                    user_id
                ))
            })
    }
}

impl AccountStore for KeyFileStore {
    fn get_secret_for_user(&self, user_id: &str) -> Result<Option<Secret>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let key_file = read_key_file(&self.path)?;

        let Some(account) = key_file.accounts.get(user_id) else {
            return Ok(None);
        };

        self.decrypt(user_id, account).map(Some)
    }

    fn get_parameters_for_user(&self, user_id: &str) -> Result<Option<OtpParameters>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let key_file = read_key_file(&self.path)?;
        Ok(key_file.accounts.get(user_id).map(Account::parameters))
    }

    fn save_secret_for_user(&self, user_id: &str, secret: &Secret) -> Result<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut key_file = read_key_file(&self.path)?;

        let account = Account {
            algorithm: self.config.algorithm,
            digits: self.config.digits,
            period: self.config.step,
            issuer: self.config.issuer.clone(),
            label: user_id.to_owned(),
            created_at: SystemClock.now_unix_seconds(),
            key: self.encrypt(secret)?,
        };
        key_file.accounts.insert(user_id.to_owned(), account);

        write_key_file(&self.path, &key_file)?;
        debug!(user = user_id, path = %self.path.display(), "key file saved");
        Ok(())
    }

    fn remove_secret_for_user(&self, user_id: &str) -> Result<bool> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut key_file = read_key_file(&self.path)?;

        if key_file.accounts.remove(user_id).is_none() {
            return Ok(false);
        }

        write_key_file(&self.path, &key_file)?;
        Ok(true)
    }
}

fn poisoned<T>(_: T) -> OtpError {
    OtpError::Store("key file lock poisoned".into())
}

fn read_key_file(path: &Path) -> Result<KeyFile> {
    let data = fs::read_to_string(path)?;
    toml::from_str::<KeyFile>(data.as_str())
        .map_err(|err| OtpError::Serialization(format!("{}: {}", path.display(), err)))
}

// Written to a uniquely named file next to the target and renamed over it,
// so readers never see a half-written file.
fn write_key_file(path: &Path, key_file: &KeyFile) -> Result<()> {
    let serialized = toml::to_string(key_file)
        .map_err(|err| OtpError::Serialization(err.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(serialized.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

use std::{collections::HashMap, sync::RwLock};

use crate::{
    error::{OtpError, Result},
    types::Secret,
};

use super::AccountStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: RwLock<HashMap<String, Secret>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.secrets.read().map(|secrets| secrets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> OtpError {
    OtpError::Store("memory store lock poisoned".into())
}

impl AccountStore for MemoryStore {
    fn get_secret_for_user(&self, user_id: &str) -> Result<Option<Secret>> {
        let secrets = self.secrets.read().map_err(poisoned)?;
        Ok(secrets.get(user_id).cloned())
    }

    fn save_secret_for_user(&self, user_id: &str, secret: &Secret) -> Result<()> {
        let mut secrets = self.secrets.write().map_err(poisoned)?;
        secrets.insert(user_id.to_owned(), secret.clone());
        Ok(())
    }

    fn remove_secret_for_user(&self, user_id: &str) -> Result<bool> {
        let mut secrets = self.secrets.write().map_err(poisoned)?;
        Ok(secrets.remove(user_id).is_some())
    }
}

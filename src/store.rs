//! Persistence of enrolled secrets, keyed by user id.

mod key_file_store;
mod memory_store;

pub use key_file_store::KeyFileStore;
pub use memory_store::MemoryStore;

use crate::{
    error::Result,
    types::{OtpParameters, Secret},
};

/// Account store the authenticator reads secrets from and writes them to.
///
/// Saving replaces any previous secret for the user as a whole; concurrent
/// writers race on a last-writer-wins basis.
pub trait AccountStore: Send + Sync {
    fn get_secret_for_user(&self, user_id: &str) -> Result<Option<Secret>>;

    fn save_secret_for_user(&self, user_id: &str, secret: &Secret) -> Result<()>;

    /// Returns whether a secret was present.
    fn remove_secret_for_user(&self, user_id: &str) -> Result<bool>;

    /// Parameters the user's secret was enrolled with. Stores that do not
    /// record them return `None` and the configured ones apply.
    fn get_parameters_for_user(&self, _user_id: &str) -> Result<Option<OtpParameters>> {
        Ok(None)
    }
}

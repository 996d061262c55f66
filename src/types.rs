mod account;
mod key_file;
mod secret;

pub use account::{Account, AccountSummary, OtpParameters};
pub use key_file::KeyFile;
pub use secret::Secret;

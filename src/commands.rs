mod import_secret;
mod open_authenticator;
mod provision;
mod revoke;
mod show_code;
mod verify_code;

pub use import_secret::import_secret;
pub use open_authenticator::{open_authenticator, read_hidden};
pub use provision::provision;
pub use revoke::revoke;
pub use show_code::show_code;
pub use verify_code::verify_code;

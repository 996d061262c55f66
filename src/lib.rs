//! One-time password provisioning and verification (RFC 4226 / RFC 6238).
//!
//! ```rust,ignore
//! use otp_guard::{Authenticator, MemoryStore, OtpConfig, SystemClock};
//!
//! let auth = Authenticator::new(OtpConfig::new("MyApp"), MemoryStore::new(), SystemClock)?;
//! let payload = auth.provision("alice")?;
//! println!("{}", payload.qr_terminal()?);
//!
//! // later, at login
//! let accepted = auth.verify("alice", "123456")?;
//! ```

pub mod config;
pub mod enums;
pub mod error;
pub mod otp;
pub mod store;
pub mod types;

pub use config::OtpConfig;
pub use enums::OtpAlgorithm;
pub use error::{OtpError, Result};
pub use otp::{
    Authenticator, Clock, HotpGenerator, ManualClock, ProvisioningPayload, ProvisioningService,
    SystemClock, VerificationService,
};
pub use store::{AccountStore, KeyFileStore, MemoryStore};
pub use types::{AccountSummary, OtpParameters, Secret};

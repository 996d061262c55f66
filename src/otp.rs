//! TOTP core: secret encoding, code derivation, clock, provisioning and
//! verification.

mod authenticator;
mod hotp_generator;
mod provisioning;
mod qr;
pub mod secret_codec;
mod totp_clock;
mod verification;

pub use authenticator::Authenticator;
pub use hotp_generator::HotpGenerator;
pub use provisioning::{
    build_provisioning_uri, generate_secret, ProvisioningPayload, ProvisioningService,
};
pub use qr::{render_svg, render_svg_data_uri, render_terminal};
pub use totp_clock::{current_counter, seconds_remaining, Clock, ManualClock, SystemClock};
pub use verification::VerificationService;

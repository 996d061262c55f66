use std::borrow::Cow;
use tracing::{debug, info};

use crate::{
    config::OtpConfig,
    error::Result,
    store::AccountStore,
    types::Secret,
};

use super::{
    provisioning::{ProvisioningPayload, ProvisioningService},
    totp_clock::{current_counter, seconds_remaining, Clock},
    verification::VerificationService,
};

/// Entry point for enrollment and login flows: ties provisioning and
/// verification to an account store and a clock.
pub struct Authenticator<S, C> {
    provisioning: ProvisioningService,
    verification: VerificationService,
    store: S,
    clock: C,
}

impl<S: AccountStore, C: Clock> Authenticator<S, C> {
    pub fn new(config: OtpConfig, store: S, clock: C) -> Result<Self> {
        Ok(Self {
            verification: VerificationService::new(&config)?,
            provisioning: ProvisioningService::new(config)?,
            store,
            clock,
        })
    }

    pub fn config(&self) -> &OtpConfig {
        self.provisioning.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Generates a new secret for `user_id`, replacing any previous one.
    /// Nothing is stored if generation fails.
    pub fn provision(&self, user_id: &str) -> Result<ProvisioningPayload> {
        let payload = self.provisioning.provision(user_id)?;
        self.store.save_secret_for_user(user_id, &payload.secret)?;
        info!(user = user_id, "provisioned one-time password secret");
        Ok(payload)
    }

    /// Stores a secret the user already has in an authenticator app.
    pub fn enroll_existing(&self, user_id: &str, base32_secret: &str) -> Result<()> {
        let secret = Secret::from_base32(base32_secret)?;
        self.store.save_secret_for_user(user_id, &secret)?;
        info!(user = user_id, "enrolled existing one-time password secret");
        Ok(())
    }

    /// `Ok(false)` covers unknown users, malformed codes and mismatches alike.
    pub fn verify(&self, user_id: &str, submitted_code: &str) -> Result<bool> {
        let Some(secret) = self.store.get_secret_for_user(user_id)? else {
            debug!(user = user_id, "no secret enrolled");
            return Ok(false);
        };

        let verification = self.verification_for(user_id)?;
        let now = self.clock.now_unix_seconds();
        let valid = verification.verify(secret.as_bytes(), submitted_code, now);
        debug!(user = user_id, valid, "verified one-time password");
        Ok(valid)
    }

    /// Current code for `user_id` and the seconds it stays current.
    pub fn current_code(&self, user_id: &str) -> Result<Option<(String, u64)>> {
        let Some(secret) = self.store.get_secret_for_user(user_id)? else {
            return Ok(None);
        };

        let verification = self.verification_for(user_id)?;
        let now = self.clock.now_unix_seconds();
        let step = verification.step();
        let code = verification
            .generator()
            .generate_code(secret.as_bytes(), current_counter(now, step))?;
        Ok(Some((code, seconds_remaining(now, step))))
    }

    // Accounts keep the parameters they were enrolled with, whatever the
    // configuration says today.
    fn verification_for(&self, user_id: &str) -> Result<Cow<'_, VerificationService>> {
        let configured = self.config();
        match self.store.get_parameters_for_user(user_id)? {
            Some(parameters) if parameters != configured.otp_parameters() => {
                debug!(
                    user = user_id,
                    algorithm = parameters.algorithm.as_str(),
                    digits = parameters.digits,
                    period = parameters.period,
                    "using enrollment parameters"
                );
                let config = configured.clone().parameters(parameters);
                Ok(Cow::Owned(VerificationService::new(&config)?))
            }
            _ => Ok(Cow::Borrowed(&self.verification)),
        }
    }

    pub fn revoke(&self, user_id: &str) -> Result<bool> {
        let removed = self.store.remove_secret_for_user(user_id)?;
        if removed {
            info!(user = user_id, "revoked one-time password secret");
        }
        Ok(removed)
    }
}

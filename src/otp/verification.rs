use std::num::NonZeroU64;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{config::OtpConfig, error::Result};

use super::{hotp_generator::HotpGenerator, totp_clock::current_counter};

/// Checks submitted codes against a secret, accepting `window` steps of
/// drift on either side of the current one.
#[derive(Debug, Clone)]
pub struct VerificationService {
    generator: HotpGenerator,
    step: NonZeroU64,
    window: u32,
}

impl VerificationService {
    pub fn new(config: &OtpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            generator: HotpGenerator::new(config.algorithm, config.digits),
            step: config.time_step()?,
            window: config.window,
        })
    }

    pub fn generator(&self) -> &HotpGenerator {
        &self.generator
    }

    pub fn step(&self) -> NonZeroU64 {
        self.step
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn verify(&self, secret: &[u8], submitted_code: &str, now_unix_seconds: i64) -> bool {
        self.verify_with(secret, submitted_code, now_unix_seconds, self.window, self.step)
    }

    /// Malformed input and generator failures both come back as `false`.
    pub fn verify_with(
        &self,
        secret: &[u8],
        submitted_code: &str,
        now_unix_seconds: i64,
        window: u32,
        step: NonZeroU64,
    ) -> bool {
        let Some(submitted) = self.normalize(submitted_code) else {
            return false;
        };

        let base_counter = current_counter(now_unix_seconds, step);

        for counter in window_counters(base_counter, window) {
            match self.generator.generate_code(secret, counter) {
                Ok(expected) => {
                    if bool::from(expected.as_bytes().ct_eq(submitted.as_bytes())) {
                        return true;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "code generation failed during verification");
                    return false;
                }
            }
        }

        false
    }

    // 1..=digits ASCII digits, zero-padded to the generator's width.
    fn normalize(&self, submitted_code: &str) -> Option<String> {
        let digits = self.generator.digits() as usize;
        if submitted_code.is_empty()
            || submitted_code.len() > digits
            || !submitted_code.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Some(format!("{:0>width$}", submitted_code, width = digits))
    }
}

/// Counters from the centre outwards: `c, c-1, c+1, …, c-w, c+w`, skipping
/// any that fall outside `u64`.
fn window_counters(base: u64, window: u32) -> impl Iterator<Item = u64> {
    std::iter::once(Some(base))
        .chain((1..=window as u64).flat_map(move |offset| {
            [base.checked_sub(offset), base.checked_add(offset)]
        }))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"12345678901234567890";
    const NOW: i64 = 1_700_000_015;

    fn service() -> VerificationService {
        VerificationService::new(&OtpConfig::default()).unwrap()
    }

    fn code_at(counter: u64) -> String {
        HotpGenerator::default().generate_code(SECRET, counter).unwrap()
    }

    #[test]
    fn accepts_current_code() {
        let base = current_counter(NOW, service().step());
        assert!(service().verify(SECRET, &code_at(base), NOW));
    }

    #[test]
    fn accepts_edges_of_window_and_rejects_beyond() {
        let service = service();
        let base = current_counter(NOW, service.step());

        assert!(service.verify(SECRET, &code_at(base + 3), NOW));
        assert!(service.verify(SECRET, &code_at(base - 3), NOW));
        assert!(!service.verify(SECRET, &code_at(base + 4), NOW));
        assert!(!service.verify(SECRET, &code_at(base - 4), NOW));
    }

    #[test]
    fn explicit_window_overrides_configured_one() {
        let service = service();
        let step = service.step();
        let base = current_counter(NOW, step);

        assert!(!service.verify_with(SECRET, &code_at(base + 1), NOW, 0, step));
        assert!(service.verify_with(SECRET, &code_at(base), NOW, 0, step));
        assert!(service.verify_with(SECRET, &code_at(base + 5), NOW, 5, step));
    }

    #[test]
    fn malformed_codes_are_rejected() {
        let service = service();
        for code in ["", "abcdef", "1234567", "12 456", "-12345", "１２３４５６", "12345a"] {
            assert!(!service.verify(SECRET, code, NOW), "{:?} accepted", code);
        }
    }

    #[test]
    fn short_codes_are_compared_zero_padded() {
        let generator = HotpGenerator::default();
        let counter = (0..100_000u64)
            .find(|c| (1..100_000).contains(&generator.generate(SECRET, *c).unwrap()))
            .unwrap();
        let padded = code_at(counter);
        let stripped = padded.trim_start_matches('0');
        let now = (counter * 30) as i64;

        assert!(padded.starts_with('0'));
        assert!(service().verify(SECRET, &padded, now));
        assert!(service().verify(SECRET, stripped, now));
    }

    #[test]
    fn window_near_epoch_skips_negative_counters() {
        let service = service();
        assert!(service.verify(SECRET, &code_at(0), 5));
        assert!(service.verify(SECRET, &code_at(3), 5));
        assert!(!service.verify(SECRET, &code_at(4), 5));
    }

    #[test]
    fn window_counters_walk_outwards() {
        assert_eq!(
            window_counters(10, 2).collect::<Vec<_>>(),
            vec![10, 9, 11, 8, 12]
        );
        assert_eq!(window_counters(1, 2).collect::<Vec<_>>(), vec![1, 0, 2, 3]);
        assert_eq!(
            window_counters(u64::MAX, 1).collect::<Vec<_>>(),
            vec![u64::MAX, u64::MAX - 1]
        );
    }

    #[test]
    fn wrong_secret_does_not_verify() {
        let base = current_counter(NOW, service().step());
        assert!(!service().verify(b"another secret", &code_at(base), NOW));
    }
}

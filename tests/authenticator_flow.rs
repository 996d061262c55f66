use otp_guard::{
    otp::{current_counter, generate_secret},
    AccountStore, Authenticator, HotpGenerator, KeyFileStore, ManualClock, OtpAlgorithm,
    OtpConfig, Secret, VerificationService,
};
use tempfile::tempdir;
use totp_rs::{Algorithm, TOTP};

const NOW: i64 = 1_700_000_000;

fn reference_totp(algorithm: Algorithm, digits: usize, step: u64, secret: &Secret) -> TOTP {
    TOTP::new_unchecked(
        algorithm,
        digits,
        0,
        step,
        secret.as_bytes().to_vec(),
        Some("Example".to_string()),
        "alice".to_string(),
    )
}

#[test]
fn codes_match_independent_totp_implementation() {
    let cases = [
        (OtpAlgorithm::Sha1, Algorithm::SHA1, 6, 30),
        (OtpAlgorithm::Sha256, Algorithm::SHA256, 8, 30),
        (OtpAlgorithm::Sha512, Algorithm::SHA512, 6, 60),
    ];

    for (ours, theirs, digits, step) in cases {
        let secret = generate_secret(20).unwrap();
        let generator = HotpGenerator::new(ours, digits);
        let reference = reference_totp(theirs, digits as usize, step, &secret);

        for time in [0u64, 59, 1_111_111_109, NOW as u64, 20_000_000_000] {
            let counter = current_counter(time as i64, step.try_into().unwrap());
            assert_eq!(
                generator.generate_code(secret.as_bytes(), counter).unwrap(),
                reference.generate(time),
                "{:?} at {}",
                ours,
                time
            );
        }
    }
}

#[test]
fn verification_accepts_codes_from_authenticator_app() {
    let secret = generate_secret(10).unwrap();
    let app = reference_totp(Algorithm::SHA1, 6, 30, &secret);
    let service = VerificationService::new(&OtpConfig::default()).unwrap();

    let code = app.generate(NOW as u64);
    assert!(service.verify(secret.as_bytes(), &code, NOW));
    assert!(service.verify(secret.as_bytes(), &code, NOW + 90));
    assert!(!service.verify(secret.as_bytes(), &code, NOW + 120));
}

#[test]
fn key_file_enrollment_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("accounts.toml");
    let config = OtpConfig::new("Example");

    let payload = {
        let store = KeyFileStore::open(&path, "correct horse", config.clone()).unwrap();
        let auth = Authenticator::new(config.clone(), store, ManualClock::new(NOW)).unwrap();
        auth.provision("alice").unwrap()
    };

    let store = KeyFileStore::open(&path, "correct horse", config.clone()).unwrap();
    assert_eq!(
        store.get_secret_for_user("alice").unwrap().as_ref(),
        Some(&payload.secret)
    );

    let auth = Authenticator::new(config, store, ManualClock::new(NOW)).unwrap();
    let app = reference_totp(Algorithm::SHA1, 6, 30, &payload.secret);

    auth.clock().advance(31);
    assert!(auth.verify("alice", &app.generate(NOW as u64)).unwrap());

    auth.clock().set(NOW + 181);
    assert!(!auth.verify("alice", &app.generate(NOW as u64)).unwrap());
}

#[test]
fn provisioning_uri_round_trips_through_authenticator_app_parser() {
    let auth = Authenticator::new(
        OtpConfig::new("ACME Corp"),
        otp_guard::MemoryStore::new(),
        ManualClock::new(NOW),
    )
    .unwrap();
    let payload = auth.provision("alice@example.com").unwrap();

    let app = TOTP::from_url_unchecked(&payload.uri).unwrap();
    assert_eq!(app.issuer.as_deref(), Some("ACME Corp"));
    assert_eq!(app.account_name, "alice@example.com");
    assert!(auth
        .verify("alice@example.com", &app.generate(NOW as u64))
        .unwrap());
}

#[test]
fn accounts_verify_with_their_enrollment_parameters() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("accounts.toml");
    let enrolled_with = OtpConfig::new("Example")
        .algorithm(OtpAlgorithm::Sha256)
        .digits(8);

    let payload = {
        let store = KeyFileStore::open(&path, "correct horse", enrolled_with.clone()).unwrap();
        let auth = Authenticator::new(enrolled_with, store, ManualClock::new(NOW)).unwrap();
        auth.provision("alice").unwrap()
    };

    // Reopened later without the enrollment configuration.
    let config = OtpConfig::new("Example");
    let store = KeyFileStore::open(&path, "correct horse", config.clone()).unwrap();
    let auth = Authenticator::new(config, store, ManualClock::new(NOW)).unwrap();
    let app = reference_totp(Algorithm::SHA256, 8, 30, &payload.secret);

    assert!(auth.verify("alice", &app.generate(NOW as u64)).unwrap());

    let (code, _) = auth.current_code("alice").unwrap().unwrap();
    assert_eq!(code, app.generate(NOW as u64));
    assert_eq!(code.len(), 8);
}

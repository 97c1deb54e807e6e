//! End-to-end MFA flows over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use signon_core::SessionConfig;
use signon_mfa::totp::code_at;
use signon_mfa::{
    CredentialProvider, JourneyType, MfaConfig, MfaContext, MfaError, MfaMethodType, MfaResult,
    MfaVerifier, NotificationPurpose, NotificationSink, OtpSender, SmsOtpMethod, TotpConfig,
    TotpMethod, TotpSecret,
};
use signon_store::InMemoryCodeStore;

const SECRET: &[u8] = b"12345678901234567890";

#[derive(Default)]
struct FakeCredentials {
    verified: Mutex<Option<TotpSecret>>,
}

#[async_trait]
impl CredentialProvider for FakeCredentials {
    async fn verified_auth_app_secret(&self, _subject: &str) -> MfaResult<Option<TotpSecret>> {
        Ok(self.verified.lock().clone())
    }

    async fn finalize_auth_app(&self, _subject: &str, secret: &TotpSecret) -> MfaResult<()> {
        *self.verified.lock() = Some(secret.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CapturingSink {
    codes: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSink for CapturingSink {
    async fn deliver(
        &self,
        _destination: &str,
        _purpose: NotificationPurpose,
        code: &str,
    ) -> MfaResult<()> {
        self.codes.lock().push(code.to_string());
        Ok(())
    }
}

fn base32_secret() -> String {
    data_encoding::BASE32_NOPAD.encode(SECRET)
}

fn current_code() -> String {
    #[allow(clippy::cast_possible_truncation)]
    let now_millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    format!("{:06}", code_at(SECRET, now_millis / 30_000))
}

fn verifier(
    store: &Arc<InMemoryCodeStore>,
    credentials: &Arc<FakeCredentials>,
    max_retries: u32,
) -> MfaVerifier<InMemoryCodeStore> {
    MfaVerifier::new(
        store.clone(),
        MfaConfig::new().max_retries(max_retries),
        SessionConfig::default(),
    )
    .register(Arc::new(TotpMethod::new(
        credentials.clone(),
        TotpConfig::default(),
    )))
    .register(Arc::new(SmsOtpMethod::new(store.clone())))
}

#[tokio::test]
async fn registration_then_sign_in_with_the_same_secret() {
    let store = Arc::new(InMemoryCodeStore::new());
    let credentials = Arc::new(FakeCredentials::default());
    let verifier = verifier(&store, &credentials, 6);

    // Registration: the secret travels with the request
    let registration = MfaContext::new("subject-1", JourneyType::Registration)
        .with_profile(base32_secret());
    verifier
        .verify(&registration, MfaMethodType::AuthApp, &current_code())
        .await
        .unwrap();

    // The success finalized the credential
    assert!(credentials.verified.lock().is_some());

    // Sign-in: the secret now comes from the stored credential
    let sign_in = MfaContext::new("subject-1", JourneyType::SignIn);
    verifier
        .verify(&sign_in, MfaMethodType::AuthApp, &current_code())
        .await
        .unwrap();
}

#[tokio::test]
async fn sign_in_before_registration_reports_missing_credential() {
    let store = Arc::new(InMemoryCodeStore::new());
    let credentials = Arc::new(FakeCredentials::default());
    let verifier = verifier(&store, &credentials, 6);

    let sign_in = MfaContext::new("subject-1", JourneyType::SignIn);
    let result = verifier
        .verify(&sign_in, MfaMethodType::AuthApp, &current_code())
        .await;
    assert!(matches!(result, Err(MfaError::CredentialMissing)));
}

#[tokio::test]
async fn sms_code_flow_with_lockout() {
    let store = Arc::new(InMemoryCodeStore::new());
    let credentials = Arc::new(FakeCredentials::default());
    let max_retries = 3;
    let verifier = verifier(&store, &credentials, max_retries);

    let sink = Arc::new(CapturingSink::default());
    let sender = OtpSender::new(store.clone(), sink.clone(), Duration::from_secs(900));
    sender
        .send(
            "subject-1",
            "+447700900000",
            NotificationPurpose::VerifyPhoneNumber,
        )
        .await
        .unwrap();
    let code = sink.codes.lock()[0].clone();

    let context = MfaContext::new("subject-1", JourneyType::Registration);
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..max_retries {
        let result = verifier.verify(&context, MfaMethodType::Sms, wrong).await;
        assert!(matches!(result, Err(MfaError::InvalidCode)));
    }

    // The correct code arrives one attempt too late
    let result = verifier.verify(&context, MfaMethodType::Sms, &code).await;
    assert!(matches!(result, Err(MfaError::LockedOut)));
}

#[tokio::test]
async fn sms_sign_in_is_rejected_with_a_fatal_error() {
    let store = Arc::new(InMemoryCodeStore::new());
    let credentials = Arc::new(FakeCredentials::default());
    let verifier = verifier(&store, &credentials, 6);

    let context = MfaContext::new("subject-1", JourneyType::SignIn);
    let result = verifier
        .verify(&context, MfaMethodType::Sms, "123456")
        .await;

    match result {
        Err(err @ MfaError::SmsSignInUnsupported) => assert!(err.is_fatal()),
        other => panic!("expected SmsSignInUnsupported, got {other:?}"),
    }
}

#[tokio::test]
async fn totp_lockout_is_per_method() {
    let store = Arc::new(InMemoryCodeStore::new());
    let credentials = Arc::new(FakeCredentials::default());
    let verifier = verifier(&store, &credentials, 1);

    let registration = MfaContext::new("subject-1", JourneyType::Registration)
        .with_profile(base32_secret());

    // Burn the auth-app attempts
    for _ in 0..2 {
        let _ = verifier
            .verify(&registration, MfaMethodType::AuthApp, "000001")
            .await;
    }
    let result = verifier
        .verify(&registration, MfaMethodType::AuthApp, &current_code())
        .await;
    assert!(matches!(result, Err(MfaError::LockedOut)));

    // SMS attempts for the same subject are unaffected
    let sms_state = verifier
        .attempt_state("subject-1", MfaMethodType::Sms)
        .await
        .unwrap();
    assert!(!sms_state.blocked);
    assert_eq!(sms_state.retry_count, 0);
}

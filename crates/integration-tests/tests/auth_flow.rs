//! Magic-Link Auth Integration Tests
//!
//! Full register -> SMS -> verify -> session flow against real SQLite
//! repositories, with a recording SMS sender standing in for Twilio.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uneventful_core::application::auth::magic_link::{self, RegisterRequest, RequestLinkOutcome};
use uneventful_core::application::{SmsRateLimiter, TokenService};
use uneventful_core::config::SmsTemplates;
use uneventful_core::error::{AppError, Result};
use uneventful_core::port::{SmsReceipt, SmsSender, SystemTimeProvider, UuidProvider};
use uneventful_infra_sqlite::{create_pool, run_migrations, SqliteUserRepository};

/// Captures outbound SMS instead of hitting a gateway
#[derive(Default)]
struct RecordingSms {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSms {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn last_body(&self) -> String {
        self.sent.lock().unwrap().last().unwrap().1.clone()
    }
}

/// Stands in for a gateway that rejects every message
struct FailingSms;

#[async_trait]
impl SmsSender for FailingSms {
    async fn send(&self, _to: &str, _body: &str) -> Result<SmsReceipt> {
        Err(AppError::Sms("gateway unavailable".to_string()))
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(SmsReceipt {
            message_id: format!("SM{}", self.sent.lock().unwrap().len()),
        })
    }
}

struct TestHarness {
    users: Arc<SqliteUserRepository>,
    limiter: SmsRateLimiter,
    tokens: TokenService,
    sms: Arc<RecordingSms>,
    templates: SmsTemplates,
    ids: UuidProvider,
    time: SystemTimeProvider,
}

impl TestHarness {
    async fn new() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        Self {
            users: Arc::new(SqliteUserRepository::new(pool)),
            limiter: SmsRateLimiter::new(Arc::new(SystemTimeProvider)),
            tokens: TokenService::new("integration-secret", "http://localhost:3000"),
            sms: Arc::new(RecordingSms::default()),
            templates: SmsTemplates::from_templates(&[(
                "magicLink",
                "Hi {{name}}! Your login link: {{magicLinkUrl}}",
            )]),
            ids: UuidProvider,
            time: SystemTimeProvider,
        }
    }

    async fn register(&self, phone: &str) -> Result<uneventful_core::domain::User> {
        magic_link::register(
            self.users.as_ref(),
            &self.limiter,
            &self.tokens,
            self.sms.as_ref(),
            &self.templates,
            &self.ids,
            &self.time,
            RegisterRequest {
                phone: phone.to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            },
        )
        .await
    }

    async fn request_link(&self, phone: &str) -> Result<RequestLinkOutcome> {
        magic_link::request_link(
            self.users.as_ref(),
            &self.limiter,
            &self.tokens,
            self.sms.as_ref(),
            &self.templates,
            phone,
        )
        .await
    }
}

/// Pull the token out of the magic-link URL in an SMS body
fn extract_token(body: &str) -> String {
    body.split("token=").nth(1).expect("token in SMS").to_string()
}

#[tokio::test]
async fn register_verify_session_round_trip() {
    let h = TestHarness::new().await;

    let user = h.register("(555) 123-4567").await.unwrap();
    assert_eq!(user.phone, "+15551234567");
    assert_eq!(user.first_name, "Ada");

    // SMS went to the normalized number and embeds the verify URL
    let sent = h.sms.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15551234567");
    assert!(sent[0].1.contains("http://localhost:3000/auth/verify?token="));

    let token = extract_token(&h.sms.last_body());
    let session = magic_link::verify(h.users.as_ref(), &h.tokens, &token)
        .await
        .unwrap();
    assert_eq!(session.user.id, user.id);

    // The session token authenticates and carries the profile
    let claims = h.tokens.verify_session_token(&session.session_token).unwrap();
    assert_eq!(claims.user_id, user.id);
    assert_eq!(claims.first_name, "Ada");
}

#[tokio::test]
async fn unknown_phone_requires_registration_without_sending() {
    let h = TestHarness::new().await;

    let outcome = h.request_link("5559990000").await.unwrap();
    assert_eq!(outcome, RequestLinkOutcome::RegistrationRequired);
    assert!(h.sms.sent().is_empty());

    // The miss did not charge the rate limit: three real sends still fit
    h.register("5559990000").await.unwrap();
    h.request_link("5559990000").await.unwrap();
    h.request_link("5559990000").await.unwrap();
    assert_eq!(h.sms.sent().len(), 3);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = TestHarness::new().await;

    h.register("5551234567").await.unwrap();
    // Same number, different formatting
    let err = h.register("+1 (555) 123-4567").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn fourth_request_in_window_is_throttled() {
    let h = TestHarness::new().await;
    h.register("5551234567").await.unwrap();

    h.request_link("5551234567").await.unwrap();
    h.request_link("5551234567").await.unwrap();

    let err = h.request_link("5551234567").await.unwrap_err();
    let AppError::RateLimited { retry_after_secs } = err else {
        panic!("expected rate limit error");
    };
    assert!(retry_after_secs > 0 && retry_after_secs <= 15 * 60);

    // Registration plus two requests got through before the cutoff
    assert_eq!(h.sms.sent().len(), 3);
}

#[tokio::test]
async fn session_token_cannot_verify_as_magic_link() {
    let h = TestHarness::new().await;
    let user = h.register("5551234567").await.unwrap();

    let session_token = h.tokens.generate_session_token(&user).unwrap();
    let err = magic_link::verify(h.users.as_ref(), &h.tokens, &session_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn expired_magic_link_is_rejected() {
    let h = TestHarness::new().await;
    h.register("5551234567").await.unwrap();

    let stale = h
        .tokens
        .sign_magic_link_with_ttl("whoever", "+15551234567", -60)
        .unwrap();
    let err = magic_link::verify(h.users.as_ref(), &h.tokens, &stale)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn sms_failure_surfaces_and_keeps_the_send_budget() {
    let h = TestHarness::new().await;
    h.register("5551230001").await.unwrap(); // one real send

    // Delivery failures bubble up as SMS errors
    for _ in 0..5 {
        let err = magic_link::request_link(
            h.users.as_ref(),
            &h.limiter,
            &h.tokens,
            &FailingSms,
            &h.templates,
            "5551230001",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Sms(_)));
    }

    // None of them counted against the window: two more sends still fit
    assert_eq!(
        h.request_link("5551230001").await.unwrap(),
        RequestLinkOutcome::LinkSent
    );
    assert_eq!(
        h.request_link("5551230001").await.unwrap(),
        RequestLinkOutcome::LinkSent
    );
    assert_eq!(h.sms.sent().len(), 3);
}

#[tokio::test]
async fn registration_sms_failure_keeps_user_and_send_budget() {
    let h = TestHarness::new().await;

    let err = magic_link::register(
        h.users.as_ref(),
        &h.limiter,
        &h.tokens,
        &FailingSms,
        &h.templates,
        &h.ids,
        &h.time,
        RegisterRequest {
            phone: "5551230002".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Sms(_)));

    // The account survived the failed delivery and a login retry works;
    // the failure did not charge the limit, so all three sends fit.
    for _ in 0..3 {
        assert_eq!(
            h.request_link("5551230002").await.unwrap(),
            RequestLinkOutcome::LinkSent
        );
    }
    assert_eq!(h.sms.sent().len(), 3);
}

#[tokio::test]
async fn id_and_time_providers_fill_new_users() {
    let h = TestHarness::new().await;
    let user = h.register("5551234567").await.unwrap();

    assert_eq!(user.id.len(), 36); // UUID v4
    assert!(user.created_at > 0);
    assert!(user.is_verified);
    assert!(!user.is_admin);
}

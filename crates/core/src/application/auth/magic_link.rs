// Magic-Link Login Use Cases

use tracing::{info, warn};

use crate::application::auth::token::TokenService;
use crate::application::rate_limit::SmsRateLimiter;
use crate::config::SmsTemplates;
use crate::domain::phone::normalize_phone_number;
use crate::domain::User;
use crate::error::{AppError, Result};
use crate::port::{IdProvider, SmsSender, TimeProvider, UserRepository};

/// Template key for the login SMS in sms.yml
const MAGIC_LINK_TEMPLATE: &str = "magicLink";

/// Outcome of a magic-link request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLinkOutcome {
    /// Phone is unknown; the client must register first. No SMS was sent and
    /// the rate limit was not charged.
    RegistrationRequired,
    /// Magic link sent to the existing user's phone.
    LinkSent,
}

/// Registration input (names arrive untrimmed from the client)
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

/// Result of verifying a magic link
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub session_token: String,
    pub user: User,
}

/// Request a magic link for an existing phone number.
pub async fn request_link(
    users: &dyn UserRepository,
    limiter: &SmsRateLimiter,
    tokens: &TokenService,
    sms: &dyn SmsSender,
    templates: &SmsTemplates,
    phone: &str,
) -> Result<RequestLinkOutcome> {
    let phone = required_phone(phone)?;
    check_rate_limit(limiter, &phone)?;

    let Some(user) = users.find_by_phone(&phone).await? else {
        info!(phone = %phone, "Magic link requested for unknown phone");
        return Ok(RequestLinkOutcome::RegistrationRequired);
    };

    send_magic_link(tokens, sms, templates, &user, &phone).await?;
    limiter.record(&phone);

    Ok(RequestLinkOutcome::LinkSent)
}

/// Register a new user and send their first magic link.
pub async fn register(
    users: &dyn UserRepository,
    limiter: &SmsRateLimiter,
    tokens: &TokenService,
    sms: &dyn SmsSender,
    templates: &SmsTemplates,
    ids: &dyn IdProvider,
    time: &dyn TimeProvider,
    req: RegisterRequest,
) -> Result<User> {
    let phone = required_phone(&req.phone)?;
    let first_name = req.first_name.trim();
    let last_name = req.last_name.trim();

    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "Phone number, first name, and last name are required".to_string(),
        ));
    }

    check_rate_limit(limiter, &phone)?;

    if users.find_by_phone(&phone).await?.is_some() {
        return Err(AppError::Conflict(
            "User already exists with this phone number".to_string(),
        ));
    }

    let user = User::new(
        ids.generate_id(),
        time.now_millis(),
        first_name,
        last_name,
        phone.clone(),
        None,
    );
    users.insert(&user).await?;

    info!(user_id = %user.id, "New user registered");

    // User creation is not rolled back on SMS failure; the user can retry
    // login and gets a fresh link.
    if let Err(e) = send_magic_link(tokens, sms, templates, &user, &phone).await {
        warn!(user_id = %user.id, error = %e, "User created but magic link SMS failed");
        return Err(e);
    }
    limiter.record(&phone);

    Ok(user)
}

/// Exchange a magic-link token for a session.
pub async fn verify(
    users: &dyn UserRepository,
    tokens: &TokenService,
    token: &str,
) -> Result<VerifiedSession> {
    let claims = tokens.verify_magic_link_token(token)?;

    let user = users
        .find_by_id(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let session_token = tokens.generate_session_token(&user)?;

    info!(user_id = %user.id, "Magic link verified, session issued");

    Ok(VerifiedSession {
        session_token,
        user,
    })
}

fn required_phone(phone: &str) -> Result<String> {
    if phone.trim().is_empty() {
        return Err(AppError::Validation("Phone number is required".to_string()));
    }
    Ok(normalize_phone_number(phone))
}

fn check_rate_limit(limiter: &SmsRateLimiter, phone: &str) -> Result<()> {
    if limiter.is_limited(phone) {
        let retry_after_secs = limiter.reset_in_secs(phone).unwrap_or(0);
        warn!(phone = %phone, retry_after_secs, "Magic link request rate limited");
        return Err(AppError::RateLimited { retry_after_secs });
    }
    Ok(())
}

async fn send_magic_link(
    tokens: &TokenService,
    sms: &dyn SmsSender,
    templates: &SmsTemplates,
    user: &User,
    phone: &str,
) -> Result<()> {
    let token = tokens.generate_magic_link_token(&user.id, phone)?;
    let url = tokens.magic_link_url(&token);
    let body = templates.format(
        MAGIC_LINK_TEMPLATE,
        &[
            ("name", user.display_name()),
            ("magicLinkUrl", url.as_str()),
        ],
    )?;

    let receipt = sms.send(phone, &body).await?;
    info!(user_id = %user.id, message_id = %receipt.message_id, "Magic link SMS sent");
    Ok(())
}

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::accounts::{Account, NewAccount, Pricing, ProviderDetails, ProviderStatus, Role};
use crate::auth::dto::{ProviderDetailsInput, PublicUser, SignupRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::verification::{code_expiry_from, generate_code, issue_code};
use crate::error::ApiError;
use crate::notify::verification_email;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug)]
pub struct RegisterOutcome {
    pub account: Account,
    pub email_sent: bool,
}

/// Creates an unverified account with a fresh code and attempts delivery.
/// The account is durable before the send; a failed send only flips
/// `email_sent` so the client can prompt a resend.
pub async fn register(state: &AppState, req: SignupRequest) -> Result<RegisterOutcome, ApiError> {
    let SignupRequest {
        name,
        email,
        password,
        phone,
        role,
        provider_details,
    } = req;
    let email = email.trim().to_string();

    if name.trim().is_empty() || email.is_empty() || password.is_empty() || phone.trim().is_empty()
    {
        return Err(ApiError::Validation("Missing required fields".into()));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if state.store.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let role = role.unwrap_or(Role::User);
    let provider_details = match role {
        Role::Provider => {
            let input = provider_details
                .ok_or_else(|| ApiError::Validation("Provider details are required".into()))?;
            Some(attach_pending(input))
        }
        _ => None,
    };

    let password_hash = hash_password(&password)?;
    let code = generate_code();
    let code_expiry = code_expiry_from(OffsetDateTime::now_utc());

    let account = state
        .store
        .insert(NewAccount {
            name,
            email,
            phone,
            password_hash,
            role,
            verified: false,
            verification_code: Some(code.clone()),
            code_expiry: Some(code_expiry),
            provider_details,
        })
        .await?;

    let (subject, html) = verification_email(&account.name, &code);
    let email_sent = match state.notifier.send(&account.email, &subject, &html).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, email = %account.email, "verification email failed");
            false
        }
    };

    info!(account_id = %account.id, role = ?account.role, "account registered");
    Ok(RegisterOutcome {
        account,
        email_sent,
    })
}

/// Applications always enter the queue pending with zeroed pricing,
/// whatever the client sent.
fn attach_pending(input: ProviderDetailsInput) -> ProviderDetails {
    ProviderDetails {
        service_type: input.service_type,
        experience: input.experience,
        address: input.address,
        citizenship: input.citizenship,
        status: ProviderStatus::Pending,
        pricing: Pricing::default(),
    }
}

/// Reissues the code (invalidating the previous one) and attempts delivery.
/// Returns whether the email went out; the new code is valid either way.
pub async fn resend(state: &AppState, email: &str) -> Result<bool, ApiError> {
    let account = state
        .store
        .find_by_email(email)
        .await?
        .ok_or(ApiError::NotFound)?;
    if account.verified {
        return Err(ApiError::AlreadyVerified);
    }

    let code = issue_code(state.store.as_ref(), &account).await?;

    let (subject, html) = verification_email(&account.name, &code);
    match state.notifier.send(&account.email, &subject, &html).await {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!(error = %e, email = %account.email, "resend email failed");
            Ok(false)
        }
    }
}

/// Checks credentials and issues a 24-hour token binding id and role.
/// Unverified accounts get a distinct outcome before the password is even
/// looked at, so the client can route to the verification flow.
pub async fn authenticate(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(String, PublicUser), ApiError> {
    let account = state
        .store
        .find_by_email(email)
        .await?
        .ok_or(ApiError::UnknownAccount)?;

    if !account.verified {
        return Err(ApiError::NotVerified);
    }

    if !verify_password(password, &account.password_hash)? {
        warn!(account_id = %account.id, "login invalid password");
        return Err(ApiError::BadCredentials);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(account.id, account.role)?;

    info!(account_id = %account.id, "login successful");
    Ok((token, PublicUser::from(&account)))
}

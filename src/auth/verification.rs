use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::accounts::{Account, AccountStore};
use crate::error::ApiError;

/// An issued code stays valid this long; expiry is checked lazily at
/// verification time, there is no background sweep.
pub const CODE_TTL_MINUTES: i64 = 10;

/// Uniform 6-digit code; the leading digit is non-zero by construction.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn code_expiry_from(now: OffsetDateTime) -> OffsetDateTime {
    now + Duration::minutes(CODE_TTL_MINUTES)
}

/// Issues a fresh code for the account, overwriting any outstanding one.
/// The previous code stops being valid the moment this persists.
pub async fn issue_code(store: &dyn AccountStore, account: &Account) -> Result<String, ApiError> {
    let code = generate_code();
    let expiry = code_expiry_from(OffsetDateTime::now_utc());
    store.set_verification_code(account.id, &code, expiry).await?;
    Ok(code)
}

/// Validates a submitted code and flips the account to verified. The code
/// must match exactly; the expiry check comes after the match, so an expired
/// but correct code reports `CodeExpired` rather than `InvalidCode`.
pub async fn verify_code(
    store: &dyn AccountStore,
    account: &Account,
    submitted: &str,
) -> Result<(), ApiError> {
    if account.verified {
        return Err(ApiError::AlreadyVerified);
    }
    match &account.verification_code {
        Some(code) if code == submitted => {}
        _ => return Err(ApiError::InvalidCode),
    }
    match account.code_expiry {
        Some(expiry) if OffsetDateTime::now_utc() <= expiry => {}
        _ => return Err(ApiError::CodeExpired),
    }
    store.mark_verified(account.id).await?;
    Ok(())
}

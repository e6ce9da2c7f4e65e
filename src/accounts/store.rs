use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Account, NewAccount, Pricing, ProviderStatus, Role};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique email constraint was violated.
    #[error("email already registered")]
    DuplicateKey,
    /// No account matched the given id.
    #[error("account not found")]
    NotFound,
    /// The store itself failed; details are for the server log only.
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Persistence boundary for accounts. Writes are whole-document,
/// last-write-wins; there is no version token.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Account>, StoreError>;

    /// Overwrites any outstanding code; the previous one stops being valid.
    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), StoreError>;

    /// Sets `verified = true` and clears the code and expiry in one write.
    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError>;

    /// Updates the provider application status, replacing the whole pricing
    /// map when one is supplied. Fails `NotFound` when the account does not
    /// exist or carries no provider details.
    async fn set_provider_decision(
        &self,
        id: Uuid,
        status: ProviderStatus,
        pricing: Option<Pricing>,
    ) -> Result<(), StoreError>;
}

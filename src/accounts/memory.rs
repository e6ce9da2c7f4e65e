use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Account, NewAccount, Pricing, ProviderStatus, Role};
use super::store::{AccountStore, StoreError};

/// In-memory store backing `AppState::fake()` and the service tests.
/// Mirrors the Postgres store's semantics, including `NotFound` on updates
/// and the email uniqueness check.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == new.email) {
            return Err(StoreError::DuplicateKey);
        }
        let now = OffsetDateTime::now_utc();
        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            role: new.role,
            verified: new.verified,
            verification_code: new.verification_code,
            code_expiry: new.code_expiry,
            provider_details: new.provider_details,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        let mut matched: Vec<Account> = accounts
            .values()
            .filter(|a| roles.contains(&a.role))
            .cloned()
            .collect();
        matched.sort_by_key(|a| a.created_at);
        Ok(matched)
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.verification_code = Some(code.to_string());
        account.code_expiry = Some(expiry);
        account.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.verified = true;
        account.verification_code = None;
        account.code_expiry = None;
        account.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn set_provider_decision(
        &self,
        id: Uuid,
        status: ProviderStatus,
        pricing: Option<Pricing>,
    ) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        let details = account
            .provider_details
            .as_mut()
            .ok_or(StoreError::NotFound)?;
        details.status = status;
        if let Some(pricing) = pricing {
            details.pricing = pricing;
        }
        account.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Test hook: rewrites the expiry of an outstanding code, so expiry can
    /// be simulated without waiting out the clock.
    pub async fn age_code(&self, id: Uuid, expiry: OffsetDateTime) {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(&id).expect("account exists");
        account.code_expiry = Some(expiry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let new = NewAccount {
            name: "Alice".into(),
            email: "alice@x.com".into(),
            phone: "1".into(),
            password_hash: "h".into(),
            role: Role::User,
            verified: false,
            verification_code: None,
            code_expiry: None,
            provider_details: None,
        };
        store.insert(new.clone()).await.unwrap();
        assert!(matches!(
            store.insert(new).await,
            Err(StoreError::DuplicateKey)
        ));
    }

    #[tokio::test]
    async fn updates_on_unknown_id_fail_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.mark_verified(id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store
                .set_provider_decision(id, ProviderStatus::Approved, None)
                .await,
            Err(StoreError::NotFound)
        ));
    }
}

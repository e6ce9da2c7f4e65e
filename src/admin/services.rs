use tracing::{info, warn};

use crate::accounts::{Account, NewAccount, Pricing, ProviderStatus, Role};
use crate::admin::dto::AddStaffRequest;
use crate::auth::password::hash_password;
use crate::auth::services::is_valid_email;
use crate::error::ApiError;
use crate::notify::{approval_email, rejection_email};
use crate::state::AppState;

pub async fn list_providers(state: &AppState) -> Result<Vec<Account>, ApiError> {
    Ok(state.store.find_by_roles(&[Role::Provider]).await?)
}

/// Everyone the admin console manages: staff, providers and other admins.
pub async fn list_staff(state: &AppState) -> Result<Vec<Account>, ApiError> {
    Ok(state
        .store
        .find_by_roles(&[Role::Staff, Role::Provider, Role::Admin])
        .await?)
}

/// Approves the application and replaces the pricing map wholesale.
/// Re-approving an already-decided application is allowed; this is also how
/// pricing gets updated later. The decision is durable before the
/// notification is attempted.
pub async fn approve(state: &AppState, id: uuid::Uuid, pricing: Pricing) -> Result<(), ApiError> {
    let account = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    state
        .store
        .set_provider_decision(id, ProviderStatus::Approved, Some(pricing))
        .await?;
    info!(account_id = %id, "provider approved");

    let (subject, html) = approval_email(&account.name);
    if let Err(e) = state.notifier.send(&account.email, &subject, &html).await {
        warn!(error = %e, email = %account.email, "approval email failed");
    }
    Ok(())
}

/// Rejects the application. Pricing is left untouched.
pub async fn reject(state: &AppState, id: uuid::Uuid) -> Result<(), ApiError> {
    let account = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    state
        .store
        .set_provider_decision(id, ProviderStatus::Rejected, None)
        .await?;
    info!(account_id = %id, "provider rejected");

    let (subject, html) = rejection_email(&account.name);
    if let Err(e) = state.notifier.send(&account.email, &subject, &html).await {
        warn!(error = %e, email = %account.email, "rejection email failed");
    }
    Ok(())
}

/// Staff accounts skip the verification flow entirely.
pub async fn add_staff(state: &AppState, req: AddStaffRequest) -> Result<Account, ApiError> {
    let AddStaffRequest {
        name,
        email,
        password,
        phone,
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
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&password)?;
    let account = state
        .store
        .insert(NewAccount {
            name,
            email,
            phone,
            password_hash,
            role: Role::Staff,
            verified: true,
            verification_code: None,
            code_expiry: None,
            provider_details: None,
        })
        .await?;
    info!(account_id = %account.id, "staff account provisioned");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::accounts::{MemoryStore, ServiceType};
    use crate::auth::dto::{ProviderDetailsInput, SignupRequest};
    use crate::auth::services::register;
    use crate::notify::testing::RecordingNotifier;

    fn provider_signup(email: &str, service_type: ServiceType) -> SignupRequest {
        SignupRequest {
            name: "Pat".into(),
            email: email.into(),
            password: "pa55word-pa55word".into(),
            phone: "0400".into(),
            role: Some(Role::Provider),
            provider_details: Some(ProviderDetailsInput {
                service_type,
                experience: None,
                address: None,
                citizenship: None,
            }),
        }
    }

    fn test_state(notifier: Arc<RecordingNotifier>) -> AppState {
        let fake = AppState::fake();
        AppState::from_parts(Arc::new(MemoryStore::new()), notifier, fake.config)
    }

    #[tokio::test]
    async fn approve_overwrites_pricing_and_sets_status() {
        let notifier = Arc::new(RecordingNotifier::new());
        let state = test_state(notifier.clone());
        let outcome = register(&state, provider_signup("pro@x.com", ServiceType::Cleaning))
            .await
            .unwrap();
        let id = outcome.account.id;

        approve(
            &state,
            id,
            Pricing {
                cleaning: 100.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let account = state.store.find_by_id(id).await.unwrap().unwrap();
        let details = account.provider_details.unwrap();
        assert_eq!(details.status, ProviderStatus::Approved);
        assert_eq!(details.pricing.cleaning, 100.0);
        assert_eq!(details.pricing.plumbing, 0.0);

        // second approval fully replaces the map
        approve(
            &state,
            id,
            Pricing {
                plumbing: 40.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let details = state
            .store
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .provider_details
            .unwrap();
        assert_eq!(details.status, ProviderStatus::Approved);
        assert_eq!(details.pricing.cleaning, 0.0);
        assert_eq!(details.pricing.plumbing, 40.0);

        let mail = notifier.last().unwrap();
        assert_eq!(mail.subject, "Provider Approved");
    }

    #[tokio::test]
    async fn reject_keeps_pricing_untouched() {
        let state = test_state(Arc::new(RecordingNotifier::new()));
        let outcome = register(&state, provider_signup("pro@x.com", ServiceType::Plumbing))
            .await
            .unwrap();
        let id = outcome.account.id;

        approve(
            &state,
            id,
            Pricing {
                plumbing: 75.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        reject(&state, id).await.unwrap();

        let details = state
            .store
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .provider_details
            .unwrap();
        assert_eq!(details.status, ProviderStatus::Rejected);
        assert_eq!(details.pricing.plumbing, 75.0);
    }

    #[tokio::test]
    async fn approve_unknown_account_is_not_found() {
        let state = test_state(Arc::new(RecordingNotifier::new()));
        let err = approve(&state, uuid::Uuid::new_v4(), Pricing::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        let err = reject(&state, uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn approval_survives_delivery_failure() {
        let state = test_state(Arc::new(RecordingNotifier::failing()));
        let outcome = register(&state, provider_signup("pro@x.com", ServiceType::Painting))
            .await
            .unwrap();
        let id = outcome.account.id;

        approve(
            &state,
            id,
            Pricing {
                painting: 60.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let details = state
            .store
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .provider_details
            .unwrap();
        assert_eq!(details.status, ProviderStatus::Approved);
    }

    #[tokio::test]
    async fn staff_are_provisioned_verified_without_details() {
        let state = test_state(Arc::new(RecordingNotifier::new()));
        let account = add_staff(
            &state,
            AddStaffRequest {
                name: "Sam".into(),
                email: "sam@x.com".into(),
                password: "staff-pass-123".into(),
                phone: "0400".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(account.role, Role::Staff);
        assert!(account.verified);
        assert!(account.verification_code.is_none());
        assert!(account.provider_details.is_none());

        let err = add_staff(
            &state,
            AddStaffRequest {
                name: "Sam".into(),
                email: "sam@x.com".into(),
                password: "staff-pass-123".into(),
                phone: "0400".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::EmailTaken));
    }

    #[tokio::test]
    async fn listings_split_by_role() {
        let state = test_state(Arc::new(RecordingNotifier::new()));
        register(&state, provider_signup("pro@x.com", ServiceType::Cleaning))
            .await
            .unwrap();
        add_staff(
            &state,
            AddStaffRequest {
                name: "Sam".into(),
                email: "sam@x.com".into(),
                password: "staff-pass-123".into(),
                phone: "0400".into(),
            },
        )
        .await
        .unwrap();

        let providers = list_providers(&state).await.unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].email, "pro@x.com");

        let staff = list_staff(&state).await.unwrap();
        assert_eq!(staff.len(), 2);
    }

    #[tokio::test]
    async fn signup_approve_listing_end_to_end() {
        let state = test_state(Arc::new(RecordingNotifier::new()));
        let outcome = register(&state, provider_signup("alice@x.com", ServiceType::Cleaning))
            .await
            .unwrap();
        assert_eq!(
            outcome.account.provider_details.as_ref().unwrap().status,
            ProviderStatus::Pending
        );

        approve(
            &state,
            outcome.account.id,
            Pricing {
                cleaning: 50.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let approved: Vec<Account> = list_providers(&state)
            .await
            .unwrap()
            .into_iter()
            .filter(|a| {
                a.provider_details
                    .as_ref()
                    .is_some_and(|d| d.status == ProviderStatus::Approved)
            })
            .collect();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].email, "alice@x.com");
        assert_eq!(
            approved[0].provider_details.as_ref().unwrap().pricing.cleaning,
            50.0
        );
    }
}

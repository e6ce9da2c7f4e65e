use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Everything except `user` shows up in the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Provider,
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Provider => "provider",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Role> {
        match s {
            "user" => Ok(Role::User),
            "provider" => Ok(Role::Provider),
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => anyhow::bail!("unknown role: {other}"),
        }
    }
}

/// Service categories offered on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Cleaning,
    Plumbing,
    Painting,
    Electrical,
}

/// Moderation state of a provider application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Pending => "pending",
            ProviderStatus::Approved => "approved",
            ProviderStatus::Rejected => "rejected",
        }
    }
}

/// Per-service rates assigned at approval time. Meaningful only once the
/// application is approved; zero until then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub cleaning: f64,
    #[serde(default)]
    pub plumbing: f64,
    #[serde(default)]
    pub painting: f64,
    #[serde(default)]
    pub electrical: f64,
}

/// Application details attached to an account iff `role = provider`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetails {
    pub service_type: ServiceType,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
    #[serde(default)]
    pub status: ProviderStatus,
    #[serde(default)]
    pub pricing: Pricing,
}

/// Account record. The hash and any outstanding verification code never
/// leave the server in JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub code_expiry: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_details: Option<ProviderDetails>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied when inserting a new account. Id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    pub verification_code: Option<String>,
    pub code_expiry: Option<OffsetDateTime>,
    pub provider_details: Option<ProviderDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_json_never_exposes_secrets() {
        let account = Account {
            id: Uuid::new_v4(),
            name: "Alice".into(),
            email: "alice@x.com".into(),
            phone: "0400000000".into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::User,
            verified: false,
            verification_code: Some("123456".into()),
            code_expiry: Some(OffsetDateTime::now_utc()),
            provider_details: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("123456"));
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("verificationCode"));
        assert!(json.contains("alice@x.com"));
    }

    #[test]
    fn provider_details_defaults_to_pending_with_zero_pricing() {
        let details: ProviderDetails =
            serde_json::from_str(r#"{"serviceType":"cleaning"}"#).unwrap();
        assert_eq!(details.status, ProviderStatus::Pending);
        assert_eq!(details.pricing, Pricing::default());
        assert_eq!(details.service_type, ServiceType::Cleaning);
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::Provider, Role::Admin, Role::Staff] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(Role::parse("superuser").is_err());
    }
}

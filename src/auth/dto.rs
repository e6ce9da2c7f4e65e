use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::{Account, Role, ServiceType};

/// Request body for signup. `providerDetails` is only honored when the role
/// is provider; status and pricing are never accepted from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub provider_details: Option<ProviderDetailsInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetailsInput {
    pub service_type: ServiceType,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: String,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the account returned to the client. Never carries the
/// password hash or an outstanding verification code.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
}

impl From<&Account> for PublicUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            verified: account.verified,
        }
    }
}

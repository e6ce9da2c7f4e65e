use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Account, NewAccount, Pricing, ProviderDetails, ProviderStatus, Role};
use super::store::{AccountStore, StoreError};

const ACCOUNT_COLUMNS: &str = "id, name, email, phone, password_hash, role, verified, \
     verification_code, code_expiry, provider_details, created_at, updated_at";

/// Raw row shape; `role` and the JSONB document are converted into domain
/// types before leaving this module.
#[derive(Debug, FromRow)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    password_hash: String,
    role: String,
    verified: bool,
    verification_code: Option<String>,
    code_expiry: Option<OffsetDateTime>,
    provider_details: Option<Json<ProviderDetails>>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> anyhow::Result<Account> {
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
            role: Role::parse(&row.role)?,
            verified: row.verified,
            verification_code: row.verification_code,
            code_expiry: row.code_expiry,
            provider_details: row.provider_details.map(|Json(d)| d),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        // 23505: unique_violation, only the email index applies here
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::DuplicateKey;
        }
    }
    StoreError::Unavailable(e.into())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, new: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts
                (id, name, email, phone, password_hash, role, verified,
                 verification_code, code_expiry, provider_details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(new.verified)
        .bind(&new.verification_code)
        .bind(new.code_expiry)
        .bind(new.provider_details.map(Json))
        .fetch_one(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(row.try_into()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        row.map(Account::try_from).transpose().map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        row.map(Account::try_from).transpose().map_err(Into::into)
    }

    async fn find_by_roles(&self, roles: &[Role]) -> Result<Vec<Account>, StoreError> {
        let role_names: Vec<&str> = roles.iter().map(Role::as_str).collect();
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = ANY($1) ORDER BY created_at"
        ))
        .bind(&role_names)
        .fetch_all(&self.db)
        .await
        .map_err(map_sqlx)?;
        rows.into_iter()
            .map(|r| Account::try_from(r).map_err(Into::into))
            .collect()
    }

    async fn set_verification_code(
        &self,
        id: Uuid,
        code: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET verification_code = $2, code_expiry = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(expiry)
        .execute(&self.db)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET verified = TRUE, verification_code = NULL, code_expiry = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn set_provider_decision(
        &self,
        id: Uuid,
        status: ProviderStatus,
        pricing: Option<Pricing>,
    ) -> Result<(), StoreError> {
        let result = match pricing {
            Some(pricing) => sqlx::query(
                r#"
                UPDATE accounts
                SET provider_details = jsonb_set(
                        jsonb_set(provider_details, '{status}', to_jsonb($2::text)),
                        '{pricing}', $3),
                    updated_at = now()
                WHERE id = $1 AND provider_details IS NOT NULL
                "#,
            )
            .bind(id)
            .bind(status.as_str())
            .bind(Json(pricing))
            .execute(&self.db)
            .await
            .map_err(map_sqlx)?,
            None => sqlx::query(
                r#"
                UPDATE accounts
                SET provider_details =
                        jsonb_set(provider_details, '{status}', to_jsonb($2::text)),
                    updated_at = now()
                WHERE id = $1 AND provider_details IS NOT NULL
                "#,
            )
            .bind(id)
            .bind(status.as_str())
            .execute(&self.db)
            .await
            .map_err(map_sqlx)?,
        };
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub frontend_url: String,
    pub jwt: JwtConfig,
    /// None means no mail server; deliveries are logged instead of sent.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "safahome".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "safahome-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) => {
                let username = std::env::var("EMAIL_USER").ok();
                let from_address = std::env::var("EMAIL_FROM")
                    .ok()
                    .or_else(|| username.clone())
                    .unwrap_or_else(|| "noreply@safahome.local".into());
                Some(SmtpConfig {
                    host,
                    port: std::env::var("SMTP_PORT")
                        .ok()
                        .and_then(|v| v.parse::<u16>().ok())
                        .unwrap_or(587),
                    username,
                    password: std::env::var("EMAIL_PASS").ok(),
                    from_address,
                    from_name: std::env::var("EMAIL_FROM_NAME")
                        .unwrap_or_else(|_| "SafaHome".into()),
                })
            }
            Err(_) => None,
        };
        Ok(Self {
            database_url,
            frontend_url,
            jwt,
            smtp,
        })
    }
}

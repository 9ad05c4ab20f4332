use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Reads configuration from the environment once, at startup.
    /// A missing or empty `JWT_SECRET` is fatal: no token could ever
    /// be signed, so the process refuses to start.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must be set to a non-empty signing secret");
        }
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "intelimaster".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "intelimaster-users".into()),
        };
        Ok(Self { database_url, jwt })
    }
}

//! Server configuration.
//!
//! Everything comes from the environment (a `.env` file is loaded first),
//! with command-line flags taking precedence for the bind address and
//! database path. `TICKLER_JWT_SECRET` is the only required setting.

use crate::error::{ServerError, ServerResult};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host, default `127.0.0.1`.
    pub host: String,
    /// Bind port, default `8000`.
    pub port: u16,
    /// SQLite database path, default `tickler.db`.
    pub database_path: String,
    /// HMAC secret for signing access tokens. Required.
    pub jwt_secret: String,
    /// Access-token lifetime in minutes, default 30.
    pub token_expiry_minutes: u64,
    /// Allowed CORS origins, comma-separated. Empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> ServerResult<Self> {
        let jwt_secret = std::env::var("TICKLER_JWT_SECRET")
            .map_err(|_| ServerError::MissingConfig {
                name: "TICKLER_JWT_SECRET",
            })?;

        let port = match std::env::var("TICKLER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ServerError::InvalidConfig {
                name: "TICKLER_PORT",
                value: raw.clone(),
            })?,
            Err(_) => 8000,
        };

        let token_expiry_minutes = match std::env::var("TICKLER_TOKEN_EXPIRY_MINUTES") {
            Ok(raw) => raw.parse().map_err(|_| ServerError::InvalidConfig {
                name: "TICKLER_TOKEN_EXPIRY_MINUTES",
                value: raw.clone(),
            })?,
            Err(_) => 30,
        };

        let cors_origins = std::env::var("TICKLER_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: std::env::var("TICKLER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_path: std::env::var("TICKLER_DATABASE_PATH")
                .unwrap_or_else(|_| "tickler.db".to_string()),
            jwt_secret,
            token_expiry_minutes,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

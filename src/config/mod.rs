use secrecy::{ExposeSecret, SecretString};
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Absent means the in-memory user store is used.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug)]
pub struct SecurityConfig {
    pub access_token_secret: SecretString,
    pub refresh_token_secret: Option<SecretString>,
    pub cookie_secure: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl SecurityConfig {
    /// Secret used for refresh tokens, falling back to the access secret.
    pub fn resolved_refresh_secret(&self) -> &SecretString {
        match &self.refresh_token_secret {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "REFRESH_TOKEN_SECRET not set; refresh tokens will be signed with ACCESS_TOKEN_SECRET"
                );
                &self.access_token_secret
            }
        }
    }

    /// True when refresh tokens get their own secret.
    pub fn has_distinct_refresh_secret(&self) -> bool {
        self.refresh_token_secret
            .as_ref()
            .is_some_and(|s| s.expose_secret() != self.access_token_secret.expose_secret())
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let access_token_secret = non_empty_var("ACCESS_TOKEN_SECRET")
            .map(SecretString::from)
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;
        let refresh_token_secret = non_empty_var("REFRESH_TOKEN_SECRET").map(SecretString::from);

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(access_token_secret, refresh_token_secret),
            Environment::Staging => Self::staging(access_token_secret, refresh_token_secret),
            Environment::Development => Self::development(access_token_secret, refresh_token_secret),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        let port = ["DASHBOARD_AUTH_PORT", "PORT"]
            .into_iter()
            .find_map(|name| non_empty_var(name).map(|value| (name, value)));
        if let Some((name, v)) = port {
            self.server.port = parse_var(name, &v)?;
        }

        // Database overrides
        if let Some(v) = non_empty_var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn development(access_token_secret: SecretString, refresh_token_secret: Option<SecretString>) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                access_token_secret,
                refresh_token_secret,
                cookie_secure: false,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging(access_token_secret: SecretString, refresh_token_secret: Option<SecretString>) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                access_token_secret,
                refresh_token_secret,
                cookie_secure: true,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production(access_token_secret: SecretString, refresh_token_secret: Option<SecretString>) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                access_token_secret,
                refresh_token_secret,
                cookie_secure: true,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

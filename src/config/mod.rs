use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the HTTP-only admin session cookie
    pub cookie_name: String,
    pub max_age_days: u32,
    /// Set the Secure attribute on the session cookie
    pub secure_cookie: bool,
}

/// Fixed-window limits for the abuse-sensitive endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub search_limit: u32,
    pub search_window_secs: u64,
    pub session_limit: u32,
    pub session_window_secs: u64,
    pub setup_limit: u32,
    pub setup_window_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdentityMode {
    /// Round-trip every token to the hosted identity provider
    Remote,
    /// Verify provider JWTs locally with the shared secret (dev/test)
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub mode: IdentityMode,
    pub base_url: String,
    pub anon_key: String,
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub base_url: String,
    pub bucket: String,
    pub service_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // HTTP overrides
        if let Ok(v) = env::var("PORT") {
            self.http.port = v.parse().unwrap_or(self.http.port);
        }
        if let Ok(v) = env::var("HTTP_ENABLE_CORS") {
            self.http.enable_cors = v.parse().unwrap_or(self.http.enable_cors);
        }
        if let Ok(v) = env::var("HTTP_CORS_ORIGINS") {
            self.http.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_DAYS") {
            self.session.max_age_days = v.parse().unwrap_or(self.session.max_age_days);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }

        // Rate limit overrides
        if let Ok(v) = env::var("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = v.parse().unwrap_or(self.rate_limit.enabled);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SEARCH") {
            self.rate_limit.search_limit = v.parse().unwrap_or(self.rate_limit.search_limit);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SEARCH_WINDOW_SECS") {
            self.rate_limit.search_window_secs =
                v.parse().unwrap_or(self.rate_limit.search_window_secs);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SESSION") {
            self.rate_limit.session_limit = v.parse().unwrap_or(self.rate_limit.session_limit);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SESSION_WINDOW_SECS") {
            self.rate_limit.session_window_secs =
                v.parse().unwrap_or(self.rate_limit.session_window_secs);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SETUP") {
            self.rate_limit.setup_limit = v.parse().unwrap_or(self.rate_limit.setup_limit);
        }
        if let Ok(v) = env::var("RATE_LIMIT_SETUP_WINDOW_SECS") {
            self.rate_limit.setup_window_secs =
                v.parse().unwrap_or(self.rate_limit.setup_window_secs);
        }

        // Identity overrides
        if let Ok(v) = env::var("IDENTITY_MODE") {
            self.identity.mode = match v.as_str() {
                "local" => IdentityMode::Local,
                _ => IdentityMode::Remote,
            };
        }
        if let Ok(v) = env::var("IDENTITY_BASE_URL") {
            self.identity.base_url = v;
        }
        if let Ok(v) = env::var("IDENTITY_ANON_KEY") {
            self.identity.anon_key = v;
        }
        if let Ok(v) = env::var("IDENTITY_JWT_SECRET") {
            self.identity.jwt_secret = v;
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_BASE_URL") {
            self.storage.base_url = v;
        }
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.storage.bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_SERVICE_KEY") {
            self.storage.service_key = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            http: HttpConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            database: DatabaseConfig { max_connections: 10, connect_timeout_secs: 30 },
            session: SessionConfig {
                cookie_name: "admin_token".to_string(),
                max_age_days: 7,
                secure_cookie: false,
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                search_limit: 120,
                search_window_secs: 60,
                session_limit: 10,
                session_window_secs: 900,
                setup_limit: 10,
                setup_window_secs: 3600,
            },
            identity: IdentityConfig {
                mode: IdentityMode::Local,
                base_url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                jwt_secret: "dev-secret-do-not-deploy".to_string(),
            },
            storage: StorageConfig {
                base_url: "http://localhost:54321".to_string(),
                bucket: "uploads".to_string(),
                service_key: String::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            http: HttpConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec!["https://staging.transtech.example".to_string()],
            },
            database: DatabaseConfig { max_connections: 20, connect_timeout_secs: 10 },
            session: SessionConfig {
                cookie_name: "admin_token".to_string(),
                max_age_days: 7,
                secure_cookie: true,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                search_limit: 60,
                search_window_secs: 60,
                session_limit: 5,
                session_window_secs: 900,
                setup_limit: 3,
                setup_window_secs: 3600,
            },
            identity: IdentityConfig {
                mode: IdentityMode::Remote,
                base_url: String::new(),
                anon_key: String::new(),
                jwt_secret: String::new(),
            },
            storage: StorageConfig {
                base_url: String::new(),
                bucket: "uploads".to_string(),
                service_key: String::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            http: HttpConfig {
                port: 3000,
                enable_cors: true,
                cors_origins: vec!["https://www.transtech.example".to_string()],
            },
            database: DatabaseConfig { max_connections: 50, connect_timeout_secs: 5 },
            session: SessionConfig {
                cookie_name: "admin_token".to_string(),
                max_age_days: 7,
                secure_cookie: true,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                search_limit: 60,
                search_window_secs: 60,
                session_limit: 5,
                session_window_secs: 900,
                setup_limit: 3,
                setup_window_secs: 3600,
            },
            identity: IdentityConfig {
                mode: IdentityMode::Remote,
                base_url: String::new(),
                anon_key: String::new(),
                jwt_secret: String::new(),
            },
            storage: StorageConfig {
                base_url: String::new(),
                bucket: "uploads".to_string(),
                service_key: String::new(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.rate_limit.enabled);
        assert!(!config.session.secure_cookie);
        assert_eq!(config.session.cookie_name, "admin_token");
        assert_eq!(config.identity.mode, IdentityMode::Local);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.rate_limit.enabled);
        assert!(config.session.secure_cookie);
        assert_eq!(config.session.max_age_days, 7);
        assert_eq!(config.identity.mode, IdentityMode::Remote);
    }
}

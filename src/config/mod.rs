use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Secret shipped for local development only. Production refuses to start with it.
pub const DEVELOPMENT_JWT_SECRET: &str = "todo-api-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub todos_file: PathBuf,
    pub users_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Attach a freshly issued token to every authenticated response
    pub renew_tokens: bool,
    /// Passwords must be strictly longer than this
    pub min_password_len: usize,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("TODO_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("TODO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Storage overrides
        if let Ok(v) = env::var("TODO_TODOS_FILE") {
            self.storage.todos_file = PathBuf::from(v);
        }
        if let Ok(v) = env::var("TODO_USERS_FILE") {
            self.storage.users_file = PathBuf::from(v);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_RENEW_TOKENS") {
            self.security.renew_tokens = v.parse().unwrap_or(self.security.renew_tokens);
        }
        if let Ok(v) = env::var("SECURITY_MIN_PASSWORD_LEN") {
            self.security.min_password_len = v.parse().unwrap_or(self.security.min_password_len);
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

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8100,
            },
            storage: StorageConfig {
                todos_file: PathBuf::from("todos.json"),
                users_file: PathBuf::from("users.json"),
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_expiry_hours: 1,
                renew_tokens: true,
                min_password_len: 6,
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8100,
            },
            storage: StorageConfig {
                todos_file: PathBuf::from("data/todos.json"),
                users_file: PathBuf::from("data/users.json"),
            },
            security: SecurityConfig {
                // Must be supplied through JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 1,
                renew_tokens: true,
                min_password_len: 6,
                enable_cors: false,
                cors_origins: vec![],
            },
        }
    }

    /// Check settings that would make the service unusable or unsafe to run.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.jwt_secret.is_empty() {
            return Err("JWT secret not configured (set JWT_SECRET)".to_string());
        }
        if self.environment == Environment::Production
            && self.security.jwt_secret == DEVELOPMENT_JWT_SECRET
        {
            return Err("refusing to use the development JWT secret in production".to_string());
        }
        if self.security.jwt_expiry_hours == 0 {
            return Err("SECURITY_JWT_EXPIRY_HOURS must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

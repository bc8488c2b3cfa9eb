// src/common/config.rs
//! Runtime configuration read from the environment (and `.env` via dotenv)

use std::env;
use std::time::Duration;
use tracing::{info, warn};

use crate::auth::models::User;

/// Id reported for the dev-mode user; real user ids start at 1
pub const DEV_USER_ID: i64 = 0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub google_client_id: Option<String>,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub reset_db: bool,
    pub dev_mode: DevModeConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://mess_api.db".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using insecure default");
            "replace_with_strong_secret".to_string()
        });

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let db_acquire_timeout = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        Self {
            database_url,
            port,
            jwt_secret,
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok().filter(|s| !s.is_empty()),
            cors_origins,
            db_max_connections,
            db_acquire_timeout,
            reset_db: env_flag("RESET_DB"),
            dev_mode: DevModeConfig::from_env(),
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Development mode: bypasses authentication with a fixed user
#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("DEV_MODE"),
            user_email: env::var("DEV_USER_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string()),
            user_name: env::var("DEV_USER_NAME").unwrap_or_else(|_| "Dev User".to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn create_dev_user(&self) -> User {
        User {
            id: DEV_USER_ID,
            email: self.user_email.clone(),
            name: Some(self.user_name.clone()),
            avatar: None,
            provider: Some("dev".to_string()),
            provider_id: Some(DEV_USER_ID.to_string()),
            created_at: None,
        }
    }

    /// `--dev`/`--dev-mode` enable, `--no-dev`/`--prod`/`--production` disable
    pub fn apply_cli_override<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        for arg in args {
            match arg.as_str() {
                "--dev" | "--dev-mode" => self.enabled = true,
                "--no-dev" | "--prod" | "--production" => self.enabled = false,
                _ => continue,
            }
            info!(dev_mode = self.enabled, "CLI override applied");
        }
        self
    }
}

/// Log dev mode status on startup
pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            dev_user = %config.user_name,
            "🔓 DEV MODE ENABLED - authentication bypassed, do not use in production"
        );
    } else {
        info!("🔒 Production mode - authentication required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_config(enabled: bool) -> DevModeConfig {
        DevModeConfig {
            enabled,
            user_email: "dev@test.com".to_string(),
            user_name: "Dev User".to_string(),
        }
    }

    #[test]
    fn test_cli_override_enables_dev_mode() {
        let config = dev_config(false).apply_cli_override(vec![
            "mess_api".to_string(),
            "--dev".to_string(),
        ]);
        assert!(config.is_enabled());
    }

    #[test]
    fn test_cli_override_last_flag_wins() {
        let config = dev_config(false).apply_cli_override(vec![
            "--dev".to_string(),
            "--prod".to_string(),
        ]);
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_cli_override_without_flags_keeps_env_value() {
        let config = dev_config(true).apply_cli_override(Vec::<String>::new());
        assert!(config.is_enabled());
    }

    #[test]
    fn test_dev_user_uses_reserved_id() {
        let user = dev_config(true).create_dev_user();
        assert_eq!(user.id, DEV_USER_ID);
        assert_eq!(user.email, "dev@test.com");
        assert_eq!(user.provider.as_deref(), Some("dev"));
    }
}

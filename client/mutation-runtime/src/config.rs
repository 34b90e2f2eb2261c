/// Configuration management for the client runtime
///
/// Loads configuration from environment variables.
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Notification side-effect settings
    pub notifications: NotificationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
}

/// Notification side-effect settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether secondary notification calls are dispatched at all
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
}

fn default_notifications_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        };

        let notifications = NotificationConfig {
            enabled: std::env::var("NOTIFICATIONS_ENABLED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_notifications_enabled),
        };

        Ok(Config { app, notifications })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                env: "development".to_string(),
            },
            notifications: NotificationConfig {
                enabled: default_notifications_enabled(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.app.env, "development");
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_from_env_defaults() {
        std::env::remove_var("APP_ENV");
        std::env::remove_var("NOTIFICATIONS_ENABLED");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert!(config.notifications.enabled);
    }
}

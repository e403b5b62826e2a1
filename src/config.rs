//! Environment driven server configuration.

use std::env;

use pushkind_common::models::config::CommonServerConfig;

/// Errors raised while reading the configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Settings of the transactional email API.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

impl EmailConfig {
    /// The HTTP mailer is only used when both the endpoint and the key are set.
    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

/// Storefront settings shared with the handlers through `web::Data`.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Hub whose catalogue is shown to anonymous visitors.
    pub hub_id: i32,
    /// Currency code rendered next to prices.
    pub currency: String,
    /// Base URL used in links sent by email.
    pub public_url: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            hub_id: 1,
            currency: "EUR".to_string(),
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing secret; a random key is generated when empty.
    pub secret: String,
    pub auth_service_url: String,
    pub domain: String,
    pub storefront: StorefrontConfig,
    pub email: EmailConfig,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_value = var_or("PORT", "8080");
        let port = port_value
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port_value.clone(),
            })?;

        let hub_value = var_or("HUB_ID", "1");
        let hub_id = hub_value
            .parse::<i32>()
            .map_err(|_| ConfigError::Invalid {
                name: "HUB_ID",
                value: hub_value.clone(),
            })?;

        let auth_service_url =
            optional_var("AUTH_SERVICE_URL").ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;

        let domain = var_or("DOMAIN", "localhost");
        let public_url =
            optional_var("PUBLIC_URL").unwrap_or_else(|| format!("https://{domain}"));

        let email = EmailConfig {
            api_url: optional_var("EMAIL_API_URL"),
            api_key: optional_var("EMAIL_API_KEY"),
            from: optional_var("EMAIL_FROM").unwrap_or_else(|| format!("noreply@{domain}")),
        };

        Ok(Self {
            database_url: var_or("DATABASE_URL", "app.db"),
            address: var_or("ADDRESS", "127.0.0.1"),
            port,
            secret: env::var("SECRET_KEY").unwrap_or_default(),
            auth_service_url,
            domain,
            storefront: StorefrontConfig {
                hub_id,
                currency: var_or("CURRENCY", "EUR"),
                public_url,
            },
            email,
        })
    }

    /// Configuration consumed by the shared pushkind middleware and routes.
    pub fn common(&self) -> CommonServerConfig {
        CommonServerConfig {
            secret: self.secret.clone(),
            auth_service_url: self.auth_service_url.clone(),
        }
    }
}

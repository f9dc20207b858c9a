use std::env;
use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_KEYCLOAK_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub keycloak_base_url: String,
    pub keycloak_realm: String,
    pub oidc_client_id: String,
    pub oidc_client_secret: Option<SecretString>,
    /// Client whose `resource_access` roles are honoured.
    pub oidc_roles_client: String,
    pub oidc_validate_issuer: bool,
    pub jwks_refresh_cooldown_secs: u64,
    pub attachment_bucket: String,
    pub max_upload_bytes: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "lms-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            keycloak_base_url: env::var("KEYCLOAK_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_KEYCLOAK_BASE_URL.to_string()),
            keycloak_realm: env::var("KEYCLOAK_REALM").unwrap_or_else(|_| "lms".to_string()),
            oidc_client_id: env::var("OIDC_CLIENT_ID")
                .unwrap_or_else(|_| "backend-client".to_string()),
            oidc_client_secret: env::var("OIDC_CLIENT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .map(SecretString::from),
            oidc_roles_client: env::var("OIDC_ROLES_CLIENT")
                .unwrap_or_else(|_| "lms-app".to_string()),
            oidc_validate_issuer: env::var("OIDC_VALIDATE_ISSUER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            jwks_refresh_cooldown_secs: env::var("JWKS_REFRESH_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            attachment_bucket: env::var("ATTACHMENT_BUCKET")
                .unwrap_or_else(|_| "attachments".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok().filter(|s| !s.is_empty()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Realm URL, which is also the `iss` claim of tokens minted by the realm.
    pub fn issuer_url(&self) -> String {
        format!(
            "{}/realms/{}",
            self.keycloak_base_url.trim_end_matches('/'),
            self.keycloak_realm
        )
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/protocol/openid-connect/certs", self.issuer_url())
    }

    pub fn token_url(&self) -> String {
        format!("{}/protocol/openid-connect/token", self.issuer_url())
    }

    /// Reject settings that only make sense on a developer machine.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.keycloak_base_url == DEFAULT_KEYCLOAK_BASE_URL {
            return Err(AppError::InternalError(
                "KEYCLOAK_BASE_URL is using its default value; point it at the identity provider"
                    .to_string(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(AppError::InternalError(
                "MAX_UPLOAD_BYTES must be greater than zero".to_string(),
            ));
        }

        if self.cors_allowed_origin.is_none() {
            log::warn!("CORS_ALLOWED_ORIGIN is not set; CORS stays permissive");
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "lms-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            keycloak_base_url: "http://keycloak:8080".to_string(),
            keycloak_realm: "lms".to_string(),
            oidc_client_id: "backend-client".to_string(),
            oidc_client_secret: None,
            oidc_roles_client: "lms-app".to_string(),
            oidc_validate_issuer: true,
            jwks_refresh_cooldown_secs: 60,
            attachment_bucket: "attachments".to_string(),
            max_upload_bytes: 1024 * 1024,
            cors_allowed_origin: None,
        }
    }
}

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Role list as it appears under `realm_access` and each
/// `resource_access` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleClaim {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims of an access token minted by the identity provider. Only the
/// fields the service reads are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub realm_access: Option<RoleClaim>,
    #[serde(default)]
    pub resource_access: HashMap<String, RoleClaim>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// Identity of the caller, established once per request by the auth
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthContext {
    pub subject: String,
    pub username: Option<String>,
    pub roles: BTreeSet<String>,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl Claims {
    /// Realm roles merged with the roles granted on `roles_client`.
    pub fn into_context(self, roles_client: &str) -> AuthContext {
        let mut roles: BTreeSet<String> = self
            .realm_access
            .map(|access| access.roles.into_iter().collect())
            .unwrap_or_default();

        if let Some(client) = self.resource_access.get(roles_client) {
            roles.extend(client.roles.iter().cloned());
        }

        AuthContext {
            subject: self.sub,
            username: self.preferred_username,
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keycloak_claims() -> Claims {
        serde_json::from_value(serde_json::json!({
            "sub": "user-1",
            "preferred_username": "alice",
            "exp": 4_102_444_800u64,
            "iat": 1_700_000_000u64,
            "realm_access": { "roles": ["offline_access", "teacher"] },
            "resource_access": {
                "lms-app": { "roles": ["admin"] },
                "account": { "roles": ["manage-account"] }
            },
            "email_verified": true
        }))
        .unwrap()
    }

    #[test]
    fn test_context_merges_realm_and_client_roles() {
        let context = keycloak_claims().into_context("lms-app");

        assert_eq!(context.subject, "user-1");
        assert_eq!(context.username.as_deref(), Some("alice"));
        assert!(context.has_role("admin"));
        assert!(context.has_role("teacher"));
        assert!(!context.has_role("manage-account"));
    }

    #[test]
    fn test_unknown_roles_client_keeps_realm_roles_only() {
        let context = keycloak_claims().into_context("other-client");

        assert!(context.has_role("teacher"));
        assert!(!context.has_role("admin"));
    }

    #[test]
    fn test_minimal_claims() {
        let claims: Claims =
            serde_json::from_str(r#"{ "sub": "user-2", "exp": 4102444800 }"#).unwrap();
        let context = claims.into_context("lms-app");

        assert_eq!(context.subject, "user-2");
        assert!(context.username.is_none());
        assert!(context.roles.is_empty());
    }
}

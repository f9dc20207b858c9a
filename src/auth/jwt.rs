use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use jsonwebtoken::{
    decode, decode_header,
    jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm},
    Algorithm, DecodingKey, Validation,
};
use tokio::sync::{Mutex, RwLock};

use crate::{
    auth::{claims::Claims, identity_provider::IdentityProviderClient, AuthContext},
    config::Config,
    errors::{AppError, AppResult},
};

/// Verifies access tokens against the identity provider's signing keys.
///
/// Keys are cached. A token signed with an unknown `kid` triggers one JWKS
/// refresh, at most once per cooldown period.
pub struct JwtVerifier {
    keys: RwLock<JwkSet>,
    identity_provider: Option<Arc<IdentityProviderClient>>,
    last_refresh: Mutex<Option<Instant>>,
    refresh_cooldown: Duration,
    issuer: Option<String>,
    roles_client: String,
}

impl JwtVerifier {
    pub fn new(config: &Config, identity_provider: Arc<IdentityProviderClient>) -> Self {
        Self::build(config, JwkSet { keys: Vec::new() }, Some(identity_provider))
    }

    /// Verifier over a fixed key set that never refreshes.
    pub fn with_keys(config: &Config, keys: JwkSet) -> Self {
        Self::build(config, keys, None)
    }

    fn build(
        config: &Config,
        keys: JwkSet,
        identity_provider: Option<Arc<IdentityProviderClient>>,
    ) -> Self {
        Self {
            keys: RwLock::new(keys),
            identity_provider,
            last_refresh: Mutex::new(None),
            refresh_cooldown: Duration::from_secs(config.jwks_refresh_cooldown_secs),
            issuer: config
                .oidc_validate_issuer
                .then(|| config.issuer_url()),
            roles_client: config.oidc_roles_client.clone(),
        }
    }

    /// Replaces the cached key set. Returns `Ok(false)` when the verifier has
    /// no provider or the cooldown has not elapsed.
    pub async fn refresh_keys(&self) -> AppResult<bool> {
        let Some(provider) = &self.identity_provider else {
            return Ok(false);
        };

        let mut last_refresh = self.last_refresh.lock().await;
        if let Some(at) = *last_refresh {
            if at.elapsed() < self.refresh_cooldown {
                log::debug!("Skipping JWKS refresh; cooldown has not elapsed");
                return Ok(false);
            }
        }
        *last_refresh = Some(Instant::now());

        let jwks = provider.fetch_jwks().await?;
        *self.keys.write().await = jwks;
        Ok(true)
    }

    pub async fn verify(&self, token: &str) -> AppResult<AuthContext> {
        let header = decode_header(token)
            .map_err(|e| AppError::Unauthorized(format!("Malformed token: {}", e)))?;

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Token has no key id".to_string()))?;

        let (key, allowed) = match self.decoding_key(kid).await? {
            Some(found) => found,
            None => {
                if let Err(err) = self.refresh_keys().await {
                    log::error!("JWKS refresh failed: {}", err);
                }
                self.decoding_key(kid).await?.ok_or_else(|| {
                    AppError::Unauthorized(format!("Unknown signing key '{}'", kid))
                })?
            }
        };

        if !allowed.contains(&header.alg) {
            return Err(AppError::Unauthorized(format!(
                "Algorithm {:?} is not accepted for signing key '{}'",
                header.alg, kid
            )));
        }

        let mut validation = Validation::new(header.alg);
        validation.algorithms = allowed;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = decode::<Claims>(token, &key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(data.claims.into_context(&self.roles_client))
    }

    async fn decoding_key(&self, kid: &str) -> AppResult<Option<(DecodingKey, Vec<Algorithm>)>> {
        let keys = self.keys.read().await;
        let Some(jwk) = keys.find(kid) else {
            return Ok(None);
        };

        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AppError::Unauthorized(format!("Unusable signing key '{}': {}", kid, e)))?;
        Ok(Some((key, allowed_algorithms(jwk))))
    }
}

/// Algorithms a key may verify: its declared `alg`, otherwise every signing
/// algorithm of its key type.
fn allowed_algorithms(jwk: &Jwk) -> Vec<Algorithm> {
    if let Some(declared) = jwk.common.key_algorithm.as_ref().and_then(signing_algorithm) {
        return vec![declared];
    }

    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => vec![
            Algorithm::RS256,
            Algorithm::RS384,
            Algorithm::RS512,
            Algorithm::PS256,
            Algorithm::PS384,
            Algorithm::PS512,
        ],
        AlgorithmParameters::EllipticCurve(_) => vec![Algorithm::ES256, Algorithm::ES384],
        AlgorithmParameters::OctetKey(_) => {
            vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512]
        }
        AlgorithmParameters::OctetKeyPair(_) => vec![Algorithm::EdDSA],
    }
}

fn signing_algorithm(alg: &KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::HS256 => Some(Algorithm::HS256),
        KeyAlgorithm::HS384 => Some(Algorithm::HS384),
        KeyAlgorithm::HS512 => Some(Algorithm::HS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}

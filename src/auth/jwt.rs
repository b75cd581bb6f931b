use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::types::{AppError, Claims};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::toml_config::{AppConfig, MAX_TOKEN_VALIDITY_SECS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(detail) => AppError::Internal(detail),
            _ => AppError::Auth("invalid token".to_string()),
        }
    }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates HS256 identity tokens.
///
/// Stateless: a token is valid iff its signature verifies under the
/// configured secret and the clock reads strictly before its `exp`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a service signing with `secret`; tokens live for `validity`.
    pub fn new(secret: &str, validity: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
            clock,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.jwt_secret(),
            validity_from_secs(config.auth.token_validity_secs),
            clock,
        )
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Signs a token for the given identity.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?
            .trunc_subsecs(0);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature and expiry and returns the claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        // Expiry is checked below against the injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureInvalid
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Clamped to [`MAX_TOKEN_VALIDITY_SECS`]; config validation rejects larger
/// values before they get here.
fn validity_from_secs(secs: u64) -> Duration {
    i64::try_from(secs.min(MAX_TOKEN_VALIDITY_SECS))
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::zero())
}

//! Token validation
//!
//! Checks run in a fixed order: signature (restricted to the configured
//! algorithm), expiry, claim presence, then subject resolution. A token that
//! fails an earlier check is never examined by a later one.

use std::str::FromStr;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::{Claims, Subject, TokenType};
use crate::errors::{KeyMaterialError, ValidationFailure};
use crate::repositories::IdentityLookup;

use super::clock::{Clock, SystemClock};
use super::key_manager::KeyMaterialProvider;

/// Outcome of validating a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid { claims: Claims, subject: Subject },
    Invalid { reason: ValidationFailure },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn reason(&self) -> Option<ValidationFailure> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid { reason } => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<(Claims, Subject), ValidationFailure> {
        match self {
            ValidationResult::Valid { claims, subject } => Ok((claims, subject)),
            ValidationResult::Invalid { reason } => Err(reason),
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Claims as found on the wire, before presence checks
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}

/// Verifies tokens and resolves their subject
pub struct TokenValidator<L: IdentityLookup> {
    keys: KeyMaterialProvider,
    lookup: L,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl<L: IdentityLookup> TokenValidator<L> {
    /// Creates a validator over `keys`
    ///
    /// # Returns
    ///
    /// * `Ok(TokenValidator)` - Keys can verify signatures
    /// * `Err(KeyMaterialError::Missing)` - No verification key is loaded (sign-only RSA material)
    pub fn new(keys: KeyMaterialProvider, lookup: L) -> Result<Self, KeyMaterialError> {
        if !keys.mode().can_verify() {
            return Err(KeyMaterialError::Missing {
                message: "no public key loaded for token verification".to_string(),
            });
        }

        let mut validation = Validation::new(keys.mode().algorithm());
        // Expiry is checked against the injected clock with no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Ok(Self {
            keys,
            lookup,
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates a token end to end
    ///
    /// Performs exactly one identity lookup when the token itself is sound.
    pub async fn validate(&self, token: &str) -> ValidationResult {
        match self.check(token).await {
            Ok((claims, subject)) => ValidationResult::Valid { claims, subject },
            Err(reason) => {
                warn!(reason = reason.code(), "Token rejected");
                ValidationResult::Invalid { reason }
            }
        }
    }

    /// Resolves the principal a token was issued for
    pub async fn subject_from_token(&self, token: &str) -> Result<Subject, ValidationFailure> {
        self.validate(token).await.into_result().map(|(_, subject)| subject)
    }

    /// Validates a token that must be an access token.
    ///
    /// A refresh token presented here is reported as `Malformed`.
    pub async fn validate_access(&self, token: &str) -> ValidationResult {
        match self.verify_claims(token) {
            Ok(claims) if claims.token_type != TokenType::Access => {
                warn!(token_type = %claims.token_type, "Non-access token presented as access token");
                ValidationResult::Invalid {
                    reason: ValidationFailure::Malformed,
                }
            }
            Ok(_) => self.validate(token).await,
            Err(reason) => ValidationResult::Invalid { reason },
        }
    }

    /// Signature, expiry and claim checks without the subject lookup
    pub fn verify_claims(&self, token: &str) -> Result<Claims, ValidationFailure> {
        self.check_algorithm(token)?;

        let data = self
            .keys
            .mode()
            .verify::<RawClaims>(token, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let raw = data.claims;

        let exp = raw.exp.ok_or(ValidationFailure::Malformed)?;
        if self.clock.now().timestamp() >= exp {
            return Err(ValidationFailure::Expired);
        }

        let subject_id = raw
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationFailure::Malformed)?;
        let iat = raw.iat.ok_or(ValidationFailure::Malformed)?;
        let token_type = raw
            .token_type
            .as_deref()
            .map(TokenType::from_str)
            .and_then(Result::ok)
            .ok_or(ValidationFailure::Malformed)?;

        Ok(Claims {
            subject_id,
            iat,
            exp,
            token_type,
        })
    }

    async fn check(&self, token: &str) -> Result<(Claims, Subject), ValidationFailure> {
        let claims = self.verify_claims(token)?;

        let subject = self
            .lookup
            .resolve(&claims.subject_id)
            .await
            .ok_or(ValidationFailure::SubjectNotFound)?;
        if !subject.is_active {
            return Err(ValidationFailure::SubjectDisabled);
        }

        debug!(subject_id = %claims.subject_id, token_type = %claims.token_type, "Token valid");
        Ok((claims, subject))
    }

    /// Rejects any header whose `alg` is not the configured algorithm,
    /// including names the JWT library does not know (such as `none`).
    fn check_algorithm(&self, token: &str) -> Result<(), ValidationFailure> {
        let header_segment = token.split('.').next().ok_or(ValidationFailure::Malformed)?;
        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_segment.trim_end_matches('='))
            .map_err(|_| ValidationFailure::Malformed)?;
        let header: RawHeader =
            serde_json::from_slice(&header_bytes).map_err(|_| ValidationFailure::Malformed)?;

        match Algorithm::from_str(&header.alg) {
            Ok(alg) if alg == self.keys.mode().algorithm() => Ok(()),
            _ => {
                warn!(declared = %header.alg, "Token algorithm does not match configuration");
                Err(ValidationFailure::InvalidSignature)
            }
        }
    }
}

/// Maps a jsonwebtoken failure onto the validation taxonomy.
///
/// The header is already known to decode and the library checks the
/// signature before it touches the payload, so an undecodable or
/// unverifiable signature segment lands here as `Base64` or `Crypto`.
fn classify(kind: &ErrorKind) -> ValidationFailure {
    match kind {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Crypto(_) => ValidationFailure::InvalidSignature,
        ErrorKind::ExpiredSignature => ValidationFailure::Expired,
        _ => ValidationFailure::Malformed,
    }
}

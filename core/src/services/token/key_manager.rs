//! Key material for JWT signing and verification
//!
//! One [`SigningMode`] is selected at startup. Symmetric mode signs and
//! verifies with a shared secret; asymmetric mode signs with an RSA private
//! key and verifies with the matching public key. Both expose the same
//! `sign`/`verify` capability so issuance and validation never branch on mode.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use ba_shared::config::{JwtConfig, SigningModeKind};

use crate::errors::{IssueError, KeyMaterialError};

/// Shared-secret key material
#[derive(Clone)]
pub struct SymmetricKeys {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// RSA key material; either half may be absent on a verify-only or
/// sign-only deployment
#[derive(Clone)]
pub struct AsymmetricKeys {
    algorithm: Algorithm,
    encoding_key: Option<EncodingKey>,
    decoding_key: Option<DecodingKey>,
    private_key_path: Option<PathBuf>,
    public_key_path: Option<PathBuf>,
}

/// The active signing scheme
#[derive(Clone)]
pub enum SigningMode {
    Symmetric(SymmetricKeys),
    Asymmetric(AsymmetricKeys),
}

impl std::fmt::Debug for SigningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningMode::Symmetric(keys) => f
                .debug_struct("Symmetric")
                .field("algorithm", &keys.algorithm)
                .finish_non_exhaustive(),
            SigningMode::Asymmetric(keys) => f
                .debug_struct("Asymmetric")
                .field("algorithm", &keys.algorithm)
                .field("private_key_path", &keys.private_key_path)
                .field("public_key_path", &keys.public_key_path)
                .field("can_sign", &keys.encoding_key.is_some())
                .field("can_verify", &keys.decoding_key.is_some())
                .finish(),
        }
    }
}

impl SigningMode {
    pub fn kind(&self) -> SigningModeKind {
        match self {
            SigningMode::Symmetric(_) => SigningModeKind::Symmetric,
            SigningMode::Asymmetric(_) => SigningModeKind::Asymmetric,
        }
    }

    /// The single algorithm tokens are signed and accepted with
    pub fn algorithm(&self) -> Algorithm {
        match self {
            SigningMode::Symmetric(keys) => keys.algorithm,
            SigningMode::Asymmetric(keys) => keys.algorithm,
        }
    }

    fn encoding_key(&self) -> Option<&EncodingKey> {
        match self {
            SigningMode::Symmetric(keys) => Some(&keys.encoding_key),
            SigningMode::Asymmetric(keys) => keys.encoding_key.as_ref(),
        }
    }

    fn decoding_key(&self) -> Option<&DecodingKey> {
        match self {
            SigningMode::Symmetric(keys) => Some(&keys.decoding_key),
            SigningMode::Asymmetric(keys) => keys.decoding_key.as_ref(),
        }
    }

    pub fn can_sign(&self) -> bool {
        self.encoding_key().is_some()
    }

    pub fn can_verify(&self) -> bool {
        self.decoding_key().is_some()
    }

    /// Encodes claims into a compact JWT
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, IssueError> {
        let key = self.encoding_key().ok_or_else(|| IssueError::SigningFailure {
            message: "no private key loaded".to_string(),
        })?;

        encode(&Header::new(self.algorithm()), claims, key).map_err(|e| IssueError::SigningFailure {
            message: e.to_string(),
        })
    }

    /// Verifies the signature and decodes the payload.
    ///
    /// `validation` must list only [`Self::algorithm`].
    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
        validation: &Validation,
    ) -> Result<TokenData<T>, jsonwebtoken::errors::Error> {
        let key = self
            .decoding_key()
            .ok_or_else(|| jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat))?;
        decode::<T>(token, key, validation)
    }
}

/// Loads and holds the key material for one issuer/validator set.
///
/// Keys are read once and shared read-only; clones are cheap.
#[derive(Clone, Debug)]
pub struct KeyMaterialProvider {
    mode: Arc<SigningMode>,
}

impl KeyMaterialProvider {
    /// Loads key material according to configuration
    ///
    /// # Returns
    ///
    /// * `Ok(KeyMaterialProvider)` - Keys loaded
    /// * `Err(KeyMaterialError::Missing)` - Secret or key file not configured, absent or unreadable
    /// * `Err(KeyMaterialError::Invalid)` - Algorithm unusable or key contents unparsable
    pub fn load(config: &JwtConfig) -> Result<Self, KeyMaterialError> {
        let algorithm = parse_algorithm(&config.algorithm)?;

        let provider = match config.mode {
            SigningModeKind::Symmetric => Self::symmetric(config.secret.as_bytes(), algorithm)?,
            SigningModeKind::Asymmetric => Self::rsa_from_files(
                config.private_key_path.as_deref().map(Path::new),
                config.public_key_path.as_deref().map(Path::new),
                algorithm,
            )?,
        };

        info!(mode = ?config.mode, algorithm = %config.algorithm, "Loaded JWT key material");
        Ok(provider)
    }

    /// Creates shared-secret key material
    pub fn symmetric(secret: &[u8], algorithm: Algorithm) -> Result<Self, KeyMaterialError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(KeyMaterialError::Invalid {
                message: format!("{:?} is not a shared-secret algorithm", algorithm),
            });
        }
        if secret.is_empty() {
            return Err(KeyMaterialError::Missing {
                message: "JWT secret is empty".to_string(),
            });
        }

        Ok(Self::from_mode(SigningMode::Symmetric(SymmetricKeys {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })))
    }

    /// Loads RSA keys from PEM files
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - PEM private key, required for signing
    /// * `public_key_path` - PEM public key, required for verification
    pub fn rsa_from_files(
        private_key_path: Option<&Path>,
        public_key_path: Option<&Path>,
        algorithm: Algorithm,
    ) -> Result<Self, KeyMaterialError> {
        if private_key_path.is_none() && public_key_path.is_none() {
            return Err(KeyMaterialError::Missing {
                message: "no RSA key path configured".to_string(),
            });
        }

        let private_pem = private_key_path.map(|p| read_key_file(p, "private")).transpose()?;
        let public_pem = public_key_path.map(|p| read_key_file(p, "public")).transpose()?;

        let mut provider = Self::from_pem_bytes(private_pem.as_deref(), public_pem.as_deref(), algorithm)?;
        if let Some(SigningMode::Asymmetric(keys)) = Arc::get_mut(&mut provider.mode) {
            keys.private_key_path = private_key_path.map(Path::to_path_buf);
            keys.public_key_path = public_key_path.map(Path::to_path_buf);
        }
        Ok(provider)
    }

    /// Creates RSA key material from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(
        private_key_pem: Option<&str>,
        public_key_pem: Option<&str>,
        algorithm: Algorithm,
    ) -> Result<Self, KeyMaterialError> {
        Self::from_pem_bytes(
            private_key_pem.map(str::as_bytes),
            public_key_pem.map(str::as_bytes),
            algorithm,
        )
    }

    fn from_pem_bytes(
        private_key_pem: Option<&[u8]>,
        public_key_pem: Option<&[u8]>,
        algorithm: Algorithm,
    ) -> Result<Self, KeyMaterialError> {
        if !matches!(algorithm, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) {
            return Err(KeyMaterialError::Invalid {
                message: format!("{:?} is not an RSA algorithm", algorithm),
            });
        }

        let encoding_key = private_key_pem
            .map(EncodingKey::from_rsa_pem)
            .transpose()
            .map_err(|e| KeyMaterialError::Invalid {
                message: format!("Invalid private key format: {}", e),
            })?;

        let decoding_key = public_key_pem
            .map(DecodingKey::from_rsa_pem)
            .transpose()
            .map_err(|e| KeyMaterialError::Invalid {
                message: format!("Invalid public key format: {}", e),
            })?;

        if encoding_key.is_none() && decoding_key.is_none() {
            return Err(KeyMaterialError::Missing {
                message: "no RSA key supplied".to_string(),
            });
        }

        Ok(Self::from_mode(SigningMode::Asymmetric(AsymmetricKeys {
            algorithm,
            encoding_key,
            decoding_key,
            private_key_path: None,
            public_key_path: None,
        })))
    }

    fn from_mode(mode: SigningMode) -> Self {
        Self { mode: Arc::new(mode) }
    }

    /// The loaded signing mode
    pub fn mode(&self) -> &SigningMode {
        &self.mode
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, KeyMaterialError> {
    Algorithm::from_str(name).map_err(|_| KeyMaterialError::Invalid {
        message: format!("Unsupported JWT algorithm: {}", name),
    })
}

fn read_key_file(path: &Path, which: &str) -> Result<Vec<u8>, KeyMaterialError> {
    debug!(path = %path.display(), "Reading {} key", which);
    fs::read(path).map_err(|e| KeyMaterialError::Missing {
        message: format!("Failed to read {} key {}: {}", which, path.display(), e),
    })
}

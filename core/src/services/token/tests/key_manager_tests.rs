//! Tests for key material loading

use std::io::Write;
use std::path::Path;

use jsonwebtoken::Algorithm;
use tempfile::NamedTempFile;

use ba_shared::config::{JwtConfig, SigningModeKind};

use super::keys::*;
use crate::domain::entities::{Claims, TokenType};
use crate::errors::{IssueError, KeyMaterialError};
use crate::services::token::KeyMaterialProvider;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn sample_claims() -> Claims {
    Claims::new("user-1", TokenType::Access, chrono::Utc::now(), std::time::Duration::from_secs(60))
}

#[test]
fn test_symmetric_from_config() {
    let config = JwtConfig::new("a-long-enough-secret-for-hmac-signing");
    let provider = KeyMaterialProvider::load(&config).unwrap();

    assert_eq!(provider.mode().kind(), SigningModeKind::Symmetric);
    assert_eq!(provider.mode().algorithm(), Algorithm::HS256);
    assert!(provider.mode().can_sign());
    assert!(provider.mode().can_verify());
}

#[test]
fn test_symmetric_empty_secret_is_missing() {
    let err = KeyMaterialProvider::symmetric(b"", Algorithm::HS256).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Missing { .. }));
}

#[test]
fn test_symmetric_rejects_rsa_algorithm() {
    let err = KeyMaterialProvider::symmetric(TEST_SECRET, Algorithm::RS256).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Invalid { .. }));
}

#[test]
fn test_unknown_algorithm_name_is_invalid() {
    let mut config = JwtConfig::new("a-long-enough-secret-for-hmac-signing");
    config.algorithm = "XS999".to_string();

    let err = KeyMaterialProvider::load(&config).unwrap_err();
    assert_eq!(err.code(), "KEY_MATERIAL_INVALID");
}

#[test]
fn test_rsa_from_files() {
    let private = write_temp(PRIVATE_KEY_PEM);
    let public = write_temp(PUBLIC_KEY_PEM);

    let config = JwtConfig::rsa(
        private.path().to_str().unwrap(),
        public.path().to_str().unwrap(),
    );
    let provider = KeyMaterialProvider::load(&config).unwrap();

    assert_eq!(provider.mode().kind(), SigningModeKind::Asymmetric);
    assert_eq!(provider.mode().algorithm(), Algorithm::RS256);
    assert!(provider.mode().can_sign());
    assert!(provider.mode().can_verify());

    let debug = format!("{:?}", provider);
    assert!(debug.contains("private_key_path"));
    assert!(!debug.contains("BEGIN"));
}

#[test]
fn test_rsa_missing_file() {
    let err = KeyMaterialProvider::rsa_from_files(
        Some(Path::new("/nonexistent/jwt_private_key.pem")),
        None,
        Algorithm::RS256,
    )
    .unwrap_err();

    match err {
        KeyMaterialError::Missing { message } => assert!(message.contains("jwt_private_key.pem")),
        other => panic!("expected Missing, got {:?}", other),
    }
}

#[test]
fn test_rsa_no_paths_configured() {
    let err = KeyMaterialProvider::rsa_from_files(None, None, Algorithm::RS256).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Missing { .. }));
}

#[test]
fn test_rsa_unparsable_pem() {
    let garbage = write_temp("-----BEGIN PUBLIC KEY-----\nnot a key\n-----END PUBLIC KEY-----\n");

    let err = KeyMaterialProvider::rsa_from_files(None, Some(garbage.path()), Algorithm::RS256).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Invalid { .. }));
}

#[test]
fn test_rsa_rejects_hmac_algorithm() {
    let err = KeyMaterialProvider::from_pem_strings(Some(PRIVATE_KEY_PEM), None, Algorithm::HS256).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Invalid { .. }));
}

#[test]
fn test_asymmetric_config_without_paths() {
    let mut config = JwtConfig::default();
    config.mode = SigningModeKind::Asymmetric;
    config.algorithm = "RS256".to_string();

    let err = KeyMaterialProvider::load(&config).unwrap_err();
    assert!(matches!(err, KeyMaterialError::Missing { .. }));
}

#[test]
fn test_verify_only_provider_cannot_sign() {
    let provider = rs256_verify_only();

    assert!(!provider.mode().can_sign());
    assert!(provider.mode().can_verify());

    let err = provider.mode().sign(&sample_claims()).unwrap_err();
    assert!(matches!(err, IssueError::SigningFailure { .. }));
}

#[test]
fn test_clones_share_key_material() {
    let provider = rs256();
    let clone = provider.clone();

    let token = provider.mode().sign(&sample_claims()).unwrap();
    let mut validation = jsonwebtoken::Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let decoded = clone.mode().verify::<Claims>(&token, &validation).unwrap();
    assert_eq!(decoded.claims.subject_id, "user-1");
}

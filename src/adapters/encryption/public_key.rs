//! RSA public-key encryptor
//!
//! Encrypts with RSA PKCS#1 v1.5 padding and returns standard Base64, which is
//! what the identity gateway expects for Aadhaar, OTP and mobile fields.

use super::Encryptor;
use crate::config::EncryptionConfig;
use crate::domain::{Result, SdkError};
use base64::{engine::general_purpose, Engine as _};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use std::fs;

/// Encryptor backed by the gateway's RSA public key
#[derive(Debug, Clone)]
pub struct RsaEncryptor {
    public_key: RsaPublicKey,
}

impl RsaEncryptor {
    /// Wraps an already parsed public key
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Parses a PEM public key (SPKI `PUBLIC KEY` or PKCS#1 `RSA PUBLIC KEY`)
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Configuration`] if the PEM cannot be parsed.
    pub fn from_public_key_pem(pem: &str) -> Result<Self> {
        let pem = pem.trim();
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| {
                SdkError::Configuration(format!("Invalid encryption public key: {e}"))
            })?;
        Ok(Self::new(public_key))
    }

    /// Builds the encryptor from the `[encryption]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the key file cannot be read or no key is configured.
    pub fn from_config(config: &EncryptionConfig) -> Result<Self> {
        if let Some(pem) = &config.public_key_pem {
            return Self::from_public_key_pem(pem);
        }

        let path = config.public_key_path.as_deref().ok_or_else(|| {
            SdkError::Configuration(
                "encryption.public_key_path or encryption.public_key_pem must be set".to_string(),
            )
        })?;

        let pem = fs::read_to_string(path).map_err(|e| {
            SdkError::Configuration(format!("Failed to read public key file {path}: {e}"))
        })?;

        tracing::debug!(path = %path, "Loaded encryption public key");
        Self::from_public_key_pem(&pem)
    }
}

impl Encryptor for RsaEncryptor {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut rng = rand::thread_rng();
        let ciphertext = self
            .public_key
            .encrypt(&mut rng, Pkcs1v15Encrypt, plaintext.as_bytes())
            .map_err(|e| SdkError::Encryption(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(ciphertext))
    }
}

//! Field encryption collaborators
//!
//! Aadhaar numbers, OTPs and mobile numbers must be encrypted with the
//! identity gateway's public key before they leave the process. The flow
//! engine only sees the [`Encryptor`] trait; [`RsaEncryptor`] is the production
//! implementation.

pub mod public_key;

pub use public_key::RsaEncryptor;

use crate::domain::Result;

/// Encrypts a single plaintext value for transmission
pub trait Encryptor: Send + Sync {
    /// Returns the transmittable ciphertext for `plaintext`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SdkError::Encryption`] if the value cannot be
    /// encrypted.
    fn encrypt(&self, plaintext: &str) -> Result<String>;
}

use crate::error::CryptoError;
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

/// Key derivation result
pub type KdfResult<T> = Result<T, CryptoError>;

/// Iteration count used by the legacy login cipher.
pub const LEGACY_PBKDF2_ITERATIONS: u32 = 1000;

/// Key Derivation Function utilities
pub struct Kdf;

impl Kdf {
    /// Derive key material using PBKDF2-HMAC-SHA1
    ///
    /// # Arguments
    /// * `password` - The secret to derive from
    /// * `salt` - Salt for key derivation
    /// * `iterations` - Number of iterations
    /// * `key_length` - Length of derived output in bytes
    ///
    /// # Example
    /// ```
    /// use crypto::kdf::{Kdf, LEGACY_PBKDF2_ITERATIONS};
    ///
    /// let material = Kdf::pbkdf2_sha1(b"key", b"salt", LEGACY_PBKDF2_ITERATIONS, 48).unwrap();
    /// assert_eq!(material.len(), 48);
    /// ```
    pub fn pbkdf2_sha1(
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        key_length: usize,
    ) -> KdfResult<Zeroizing<Vec<u8>>> {
        if iterations == 0 {
            return Err(CryptoError::KeyDerivationFailed(
                "iteration count must be positive".to_string(),
            ));
        }

        let mut derived_key = Zeroizing::new(vec![0u8; key_length]);
        pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut derived_key);

        Ok(derived_key)
    }
}

use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{Kdf, LEGACY_PBKDF2_ITERATIONS};
use aes::Aes256;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// Reversible cipher used for stored login passwords and forgot-password keys.
///
/// Key material is derived once from the configured key and salt and is
/// zeroized when the cipher is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LegacyCipher {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for LegacyCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyCipher").finish_non_exhaustive()
    }
}

impl LegacyCipher {
    /// Build a cipher from the configured key and salt.
    ///
    /// # Errors
    /// Returns `CryptoError::Configuration` when either value is empty.
    pub fn new(key: &str, salt: &str) -> CryptoResult<Self> {
        if key.is_empty() || salt.is_empty() {
            return Err(CryptoError::Configuration(
                "encryption key/salt not configured".to_string(),
            ));
        }

        let material = Kdf::pbkdf2_sha1(
            key.as_bytes(),
            salt.as_bytes(),
            LEGACY_PBKDF2_ITERATIONS,
            KEY_LEN + IV_LEN,
        )?;

        let (key_part, iv_part) = material.split_at(KEY_LEN);
        let mut cipher = Self {
            key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        };
        cipher.key.copy_from_slice(key_part);
        cipher.iv.copy_from_slice(iv_part);

        Ok(cipher)
    }

    /// Encrypt `plain_text` and return standard base64.
    pub fn encrypt(&self, plain_text: &str) -> CryptoResult<String> {
        let utf16: Vec<u8> = plain_text
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();

        let encryptor = Aes256CbcEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        let cipher_text = encryptor.encrypt_padded_vec_mut::<Pkcs7>(&utf16);

        Ok(BASE64.encode(cipher_text))
    }

    /// Decrypt base64 produced by [`LegacyCipher::encrypt`].
    pub fn decrypt(&self, cipher_text: &str) -> CryptoResult<String> {
        let data = BASE64
            .decode(cipher_text.trim())
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;

        if data.is_empty() || data.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::InvalidFormat(
                "cipherText is not a multiple of the block size".to_string(),
            ));
        }

        let decryptor = Aes256CbcDec::new_from_slices(&self.key, &self.iv)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
        let plain = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&data)
            .map_err(|_| CryptoError::DecryptionFailed("invalid padding".to_string()))?;

        decode_utf16_le(&plain)
    }
}

fn decode_utf16_le(bytes: &[u8]) -> CryptoResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(CryptoError::InvalidUtf16(
            "odd number of bytes".to_string(),
        ));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| match pair {
            [lo, hi] => u16::from_le_bytes([*lo, *hi]),
            _ => 0,
        })
        .collect();

    String::from_utf16(&units).map_err(|e| CryptoError::InvalidUtf16(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cipher() -> LegacyCipher {
        LegacyCipher::new("login-key", "login-salt").unwrap()
    }

    #[test]
    fn test_known_answer() {
        let cipher = cipher();
        assert_eq!(cipher.encrypt("secret").unwrap(), "OvzbE+vzqab3OYFQ9OEHKg==");
        assert_eq!(
            cipher.encrypt("Password@123").unwrap(),
            "gsZEpToxN3bs9GHSco7eL3yu4q2hObley9oYEIWa7jE="
        );
    }

    #[test]
    fn test_empty_plaintext_is_one_padded_block() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("").unwrap();
        assert_eq!(encrypted, "uVphhw98BvZGmJkrCk3IUg==");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "");
    }

    #[test]
    fn test_decrypt_known_ciphertext() {
        assert_eq!(cipher().decrypt("OvzbE+vzqab3OYFQ9OEHKg==").unwrap(), "secret");
    }

    #[test]
    fn test_missing_key_or_salt() {
        let err = LegacyCipher::new("", "salt").unwrap_err();
        assert!(err.to_string().contains("encryption key/salt not configured"));
        assert!(LegacyCipher::new("key", "").is_err());
    }

    #[test]
    fn test_rejects_partial_block() {
        let err = cipher().decrypt(&BASE64.encode([1u8; 10])).unwrap_err();
        assert!(err.to_string().contains("not a multiple of the block size"));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(matches!(
            cipher().decrypt("***not base64***"),
            Err(CryptoError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_wrong_key_does_not_decrypt() {
        let encrypted = cipher().encrypt("Password@123").unwrap();
        let other = LegacyCipher::new("other-key", "login-salt").unwrap();
        assert_ne!(other.decrypt(&encrypted).ok().as_deref(), Some("Password@123"));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let rendered = format!("{:?}", cipher());
        assert_eq!(rendered, "LegacyCipher { .. }");
    }

    proptest! {
        #[test]
        fn prop_round_trip(plain in "\\PC{0,64}") {
            let cipher = cipher();
            let encrypted = cipher.encrypt(&plain).unwrap();
            prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), plain);
        }
    }
}

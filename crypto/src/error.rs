use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid encrypted data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid UTF-16 in decrypted data: {0}")]
    InvalidUtf16(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

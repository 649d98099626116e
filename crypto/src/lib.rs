//! Cryptographic primitives for the aggregator backend.
//!
//! The login store keeps passwords as ciphertext produced by a legacy
//! scheme that must stay byte-compatible with existing rows:
//!
//! - PBKDF2-HMAC-SHA1, 1000 iterations, 48 derived bytes
//!   (32-byte AES key followed by a 16-byte IV)
//! - AES-256-CBC with PKCS#7 padding
//! - plaintext encoded as UTF-16LE
//! - ciphertext transported as standard base64
//!
//! # Example
//!
//! ```rust
//! use crypto::LegacyCipher;
//!
//! let cipher = LegacyCipher::new("login-key", "login-salt").unwrap();
//! let encrypted = cipher.encrypt("secret").unwrap();
//! assert_eq!(cipher.decrypt(&encrypted).unwrap(), "secret");
//! ```

pub mod error;
pub mod kdf;
pub mod legacy_cipher;

pub use error::*;
pub use legacy_cipher::LegacyCipher;

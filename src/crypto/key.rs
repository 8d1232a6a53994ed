use sha2::{Digest, Sha256};

use crate::config::secrets::CredentialPair;
use crate::error::{Error, Result};

/// How the 32-byte cache key is derived from the credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Derivation {
    /// SHA-256 over `consumer_key || consumer_secret`.
    #[default]
    Concat,
    /// Bit-for-bit with the historic derivation that fed no credential bytes
    /// into the digest. Only useful for reading cache entries written by that
    /// version; must be selected explicitly via `credentials.legacy_empty_key`.
    LegacyEmptyDigest,
}

/// Derive the symmetric cache key. Deterministic: identical credentials yield
/// the identical key across restarts, so previously written cache entries
/// stay decryptable.
pub fn derive_key(creds: &CredentialPair, mode: Derivation) -> Result<[u8; 32]> {
    if creds.consumer_key.is_empty() || creds.consumer_secret.is_empty() {
        return Err(Error::config("consumer key or consumer secret is empty"));
    }
    let mut hasher = Sha256::new();
    if mode == Derivation::Concat {
        hasher.update(creds.consumer_key.as_bytes());
        hasher.update(creds.consumer_secret.as_bytes());
    }
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(key: &str, secret: &str) -> CredentialPair {
        CredentialPair {
            consumer_key: key.to_owned(),
            consumer_secret: secret.to_owned(),
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let pair = creds("ck", "cs");
        let k1 = derive_key(&pair, Derivation::Concat).unwrap();
        let k2 = derive_key(&pair, Derivation::Concat).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn different_credentials_different_keys() {
        let k1 = derive_key(&creds("ck", "cs"), Derivation::Concat).unwrap();
        let k2 = derive_key(&creds("ck", "other"), Derivation::Concat).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn empty_credentials_rejected() {
        assert!(matches!(
            derive_key(&creds("", "cs"), Derivation::Concat),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            derive_key(&creds("ck", ""), Derivation::Concat),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn legacy_mode_ignores_credential_bytes() {
        let legacy_a = derive_key(&creds("ck", "cs"), Derivation::LegacyEmptyDigest).unwrap();
        let legacy_b = derive_key(&creds("x", "y"), Derivation::LegacyEmptyDigest).unwrap();
        assert_eq!(legacy_a, legacy_b);
        let concat = derive_key(&creds("ck", "cs"), Derivation::Concat).unwrap();
        assert_ne!(legacy_a, concat);
    }
}

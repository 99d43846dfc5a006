use crate::algorithm::{SignatureAlgorithm, Signer, Verifier};
use crate::error::{Error, Result};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// HS256 signer (HMAC with SHA-256)
#[derive(Clone)]
pub struct HmacSha256Signer {
    issuer: Option<String>,
    key_id: Option<String>,
    secret: Vec<u8>,
}

impl HmacSha256Signer {
    /// Create a signer for a shared secret, without issuer or key id
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            issuer: None,
            key_id: None,
            secret: secret.into(),
        }
    }

    /// Set the issuer identity
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the key id
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl std::fmt::Debug for HmacSha256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Signer")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl Signer for HmacSha256Signer {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::HS256
    }

    fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, source: &[u8]) -> Result<Vec<u8>> {
        mac_sha256(&self.secret, source)
    }
}

/// HS256 verifier (HMAC with SHA-256)
#[derive(Clone)]
pub struct HmacSha256Verifier {
    secret: Vec<u8>,
}

impl HmacSha256Verifier {
    /// Create a verifier for a shared secret
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for HmacSha256Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Verifier").finish_non_exhaustive()
    }
}

impl Verifier for HmacSha256Verifier {
    /// Verify with constant-time comparison
    fn verify(&self, source: &[u8], signature: &[u8]) -> Result<()> {
        let expected_signature = mac_sha256(&self.secret, source)?;

        if signature.len() != expected_signature.len() {
            return Err(Error::SignatureInvalid);
        }

        if constant_time_eq(signature, &expected_signature) {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}

fn mac_sha256(secret: &[u8], source: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| Error::KeyRejected(format!("HMAC key: {e}")))?;
    mac.update(source);
    Ok(mac.finalize().into_bytes().to_vec())
}

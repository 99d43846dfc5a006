use crate::algorithm::{SignatureAlgorithm, Signer, Verifier};
use crate::error::{Error, Result};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey};

/// RS256 signer (RSASSA-PKCS1-v1_5 with SHA-256)
pub struct RsaSha256Signer {
    issuer: Option<String>,
    key_id: Option<String>,
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl RsaSha256Signer {
    /// Create a signer from a PKCS#8 DER-encoded private key
    pub fn from_pkcs8(private_key_der: &[u8]) -> Result<Self> {
        let key_pair = RsaKeyPair::from_pkcs8(private_key_der)
            .map_err(|e| Error::KeyRejected(format!("RSA private key: {e}")))?;

        Ok(Self {
            issuer: None,
            key_id: None,
            key_pair,
            rng: SystemRandom::new(),
        })
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

    /// Verifier for the public half of this key pair
    pub fn verifier(&self) -> RsaSha256Verifier {
        RsaSha256Verifier::new(self.key_pair.public_key().as_ref())
    }
}

impl std::fmt::Debug for RsaSha256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSha256Signer")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl Signer for RsaSha256Signer {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::RS256
    }

    fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, source: &[u8]) -> Result<Vec<u8>> {
        let mut signature = vec![0u8; self.key_pair.public_modulus_len()];
        self.key_pair
            .sign(&signature::RSA_PKCS1_SHA256, &self.rng, source, &mut signature)
            .map_err(|e| Error::SigningFailed(format!("RSA: {e}")))?;
        Ok(signature)
    }
}

/// RS256 verifier
///
/// Accepts the DER-encoded RSA public key (PKCS#1 `RSAPublicKey`).
#[derive(Debug, Clone)]
pub struct RsaSha256Verifier {
    public_key_der: Vec<u8>,
}

impl RsaSha256Verifier {
    /// Create a verifier from a DER-encoded public key
    pub fn new(public_key_der: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key_der: public_key_der.into(),
        }
    }
}

impl Verifier for RsaSha256Verifier {
    fn verify(&self, source: &[u8], signature: &[u8]) -> Result<()> {
        let public_key =
            UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, &self.public_key_der);

        public_key
            .verify(source, signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}

use crate::algorithm::SignatureAlgorithm;
use crate::error::Result;
use std::sync::Arc;

/// Signing capability used on the construction path
///
/// A signer carries the identity a token is issued under: the issuer put into
/// the `iss` claim and the key id put into the `kid` header.
pub trait Signer: Send + Sync {
    /// The algorithm this signer produces signatures for
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Issuer identity, copied into the payload when present
    fn issuer(&self) -> Option<&str>;

    /// Key id, copied into the header when present
    fn key_id(&self) -> Option<&str>;

    /// Sign the signing input (`header_b64.payload_b64`)
    fn sign(&self, source: &[u8]) -> Result<Vec<u8>>;
}

/// Signature verification capability
///
/// Implementations return `Err(Error::SignatureInvalid)` when the signature
/// does not match.
pub trait Verifier: Send + Sync {
    /// Verify `signature` over `source`
    ///
    /// # Arguments
    /// * `source` - The bytes that were signed (header.payload)
    /// * `signature` - The decoded signature bytes
    fn verify(&self, source: &[u8], signature: &[u8]) -> Result<()>;
}

/// Candidate verifiers returned by discovery
pub type Verifiers = Vec<Arc<dyn Verifier>>;

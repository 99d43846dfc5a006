mod traits;

pub mod hmac;

#[cfg(feature = "rs256")]
pub mod rsa;

pub use traits::{Signer, Verifier, Verifiers};

use crate::error::{Error, Result};
use crate::limits::MAX_ALG_LENGTH;

/// Signature algorithm named by the `alg` header
///
/// The set is closed: any other name is rejected as unknown, which is a
/// different failure from a known algorithm that has no configured provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// HMAC with SHA-256
    HS256,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
}

impl SignatureAlgorithm {
    /// Parse algorithm string from a token header
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::HeaderFieldTooLong {
                field: "alg",
                length: s.len(),
                max: MAX_ALG_LENGTH,
            });
        }

        match s {
            "HS256" => Ok(SignatureAlgorithm::HS256),
            "RS256" => Ok(SignatureAlgorithm::RS256),
            _ => Err(Error::AlgorithmUnknown(s.to_string())),
        }
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            SignatureAlgorithm::HS256 => "HS256",
            SignatureAlgorithm::RS256 => "RS256",
        }
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        matches!(self, SignatureAlgorithm::HS256)
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for SignatureAlgorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            SignatureAlgorithm::from_str("HS256").unwrap(),
            SignatureAlgorithm::HS256
        );
        assert_eq!(
            SignatureAlgorithm::from_str("RS256").unwrap(),
            SignatureAlgorithm::RS256
        );

        assert!(matches!(
            SignatureAlgorithm::from_str("none"),
            Err(Error::AlgorithmUnknown(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::from_str("HS512"),
            Err(Error::AlgorithmUnknown(_))
        ));
        assert!(matches!(
            SignatureAlgorithm::from_str("hs256"),
            Err(Error::AlgorithmUnknown(_))
        ));
    }

    #[test]
    fn test_algorithm_name_too_long() {
        let name = "H".repeat(MAX_ALG_LENGTH + 1);
        assert!(matches!(
            SignatureAlgorithm::from_str(&name),
            Err(Error::HeaderFieldTooLong { field: "alg", .. })
        ));
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(format!("{}", SignatureAlgorithm::HS256), "HS256");
        assert_eq!(format!("{}", SignatureAlgorithm::RS256), "RS256");
        assert!(SignatureAlgorithm::HS256.is_symmetric());
        assert!(!SignatureAlgorithm::RS256.is_symmetric());
    }
}

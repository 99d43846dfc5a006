//! Size limit constants for input validation

/// Maximum length for a token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

// ============================================================================
// Decoded segment size limits
// ============================================================================

/// Maximum size for decoded header JSON (8KB)
/// Headers are typically small (< 1KB), but we allow reasonable margin
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded payload JSON (64KB)
/// Payloads can contain application claims, but must be bounded to prevent DoS
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA signatures are typically 256-512 bytes, but we allow margin for larger keys
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

// ============================================================================
// Header field size limits
// ============================================================================

/// Maximum length for algorithm (alg) field in the header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for key ID (kid) field in the header (256 bytes)
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// Validation bounds
// ============================================================================

/// Default clock skew tolerance (60 seconds)
pub const DEFAULT_CLOCK_SKEW_SECONDS: u64 = 60;

/// Maximum clock skew tolerance (300 seconds = 5 minutes)
/// Prevents clock skew from effectively disabling expiration checks
pub const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

// ============================================================================
// Cache bounds
// ============================================================================

/// Maximum issuer length used as a verifier cache key (2048 bytes)
#[cfg(feature = "cache")]
pub(crate) const MAX_CACHE_KEY_LENGTH: usize = 2048;

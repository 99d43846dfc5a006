//! Error types for token parsing, verification and signing
//!
//! Failures fall into two families that callers must be able to tell apart:
//!
//! - [`Error`]: the token is invalid. Every variant classifies into one
//!   [`ErrorCode`] of a closed set, and keeps the underlying cause reachable
//!   through [`std::error::Error::source`].
//! - [`UsageError`]: the caller misused the API, e.g. handed `verify` a token
//!   that never went through `deserialize`. This is an integration bug, not a
//!   verdict on the token.
//!
//! Both engines return [`VerifyError`], which holds exactly one of the two.

use crate::algorithm::SignatureAlgorithm;
use thiserror::Error;

/// Boxed foreign error carried by [`Error::Unknown`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed classification of token validity failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Wire string failed structural decode
    MalformedTokenString,
    /// Algorithm unknown, or known but without a configured provider
    UnsupportedAlgorithm,
    /// Provider found no candidate verifier for the issuer / key id
    NoVerifier,
    /// Every candidate verifier rejected the signature
    BadSignature,
    /// Time window or checker policy rejected the token
    PolicyFailure,
    /// Failure without a recognized kind
    Unknown,
}

impl ErrorCode {
    /// Stable string form
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedTokenString => "MALFORMED_TOKEN_STRING",
            ErrorCode::UnsupportedAlgorithm => "UNSUPPORTED_ALGORITHM",
            ErrorCode::NoVerifier => "NO_VERIFIER",
            ErrorCode::BadSignature => "BAD_SIGNATURE",
            ErrorCode::PolicyFailure => "POLICY_FAILURE",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token validity failures
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid token format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("Token {segment} is not valid UTF-8")]
    FormatInvalidUtf8 {
        segment: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to parse {segment} JSON")]
    FormatInvalidJson {
        segment: &'static str,
        #[source]
        source: miniserde::Error,
    },

    #[error("Token {0} is not a JSON object")]
    FormatNotObject(&'static str),

    #[error("Claim '{claim}' must be {expected}")]
    ClaimInvalidType {
        claim: &'static str,
        expected: &'static str,
    },

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not recognized")]
    AlgorithmUnknown(String),

    #[error("Algorithm '{0}' has no configured verifier provider")]
    AlgorithmUnsupported(SignatureAlgorithm),

    // ============================================================================
    // Discovery and Signature Errors
    // ============================================================================
    #[error("No verifier found for issuer {issuer:?} and key id {key_id:?}")]
    NoVerifier {
        issuer: Option<String>,
        key_id: Option<String>,
    },

    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Policy Errors
    // ============================================================================
    #[error("Token issued in future at {issued_at} (now: {now}, skew: {skew}s)")]
    TokenIssuedInFuture { issued_at: i64, now: i64, skew: u64 },

    #[error("Token expired at {expired_at} (now: {now}, skew: {skew}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token issued at {issued_at} after its expiration at {expired_at}")]
    TokenTimeRangeInverted { issued_at: i64, expired_at: i64 },

    #[error("Token audience mismatch: expected one of {expected:?}, found '{found}'")]
    AudienceMismatch { expected: Vec<String>, found: String },

    #[error("Required token claim '{0}' is missing")]
    ClaimMissing(String),

    #[error("Token claim validation failed: {0}")]
    ClaimInvalid(String),

    // ============================================================================
    // Key and Collaborator Errors
    // ============================================================================
    #[error("Key rejected: {0}")]
    KeyRejected(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Unclassified failure: {0}")]
    Unknown(#[source] BoxError),
}

impl Error {
    /// Wrap a foreign error that carries no recognized kind
    pub fn unknown(error: impl Into<BoxError>) -> Self {
        Error::Unknown(error.into())
    }

    /// Classify this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::TokenTooLarge { .. }
            | Error::FormatInvalid
            | Error::FormatInvalidBase64(_)
            | Error::FormatInvalidUtf8 { .. }
            | Error::FormatInvalidJson { .. }
            | Error::FormatNotObject(_)
            | Error::ClaimInvalidType { .. }
            | Error::HeaderFieldTooLong { .. } => ErrorCode::MalformedTokenString,
            Error::AlgorithmUnknown(_) | Error::AlgorithmUnsupported(_) => {
                ErrorCode::UnsupportedAlgorithm
            }
            Error::NoVerifier { .. } => ErrorCode::NoVerifier,
            Error::SignatureInvalid => ErrorCode::BadSignature,
            Error::TokenIssuedInFuture { .. }
            | Error::TokenExpired { .. }
            | Error::TokenTimeRangeInverted { .. }
            | Error::AudienceMismatch { .. }
            | Error::ClaimMissing(_)
            | Error::ClaimInvalid(_) => ErrorCode::PolicyFailure,
            Error::KeyRejected(_) | Error::SigningFailed(_) | Error::Unknown(_) => {
                ErrorCode::Unknown
            }
        }
    }
}

/// Caller misuse of the API
///
/// These never describe a forged or expired token; they mean the token
/// should not have reached this call in the first place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Token has no signature segment")]
    SignatureMissing,

    #[error("Token header has no 'alg' field")]
    AlgorithmMissing,

    #[error("Token was not materialized from a token string")]
    TokenStringMissing,

    #[error("Clock skew too large: {value} seconds (maximum: {max} seconds)")]
    ClockSkewTooLarge { value: u64, max: u64 },
}

/// Outcome of a failed parse or verification
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The token is invalid
    #[error(transparent)]
    Invalid(#[from] Error),

    /// The API was misused
    #[error(transparent)]
    Misuse(#[from] UsageError),
}

impl VerifyError {
    /// Classification, `None` for misuse
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            VerifyError::Invalid(error) => Some(error.code()),
            VerifyError::Misuse(_) => None,
        }
    }

    /// Whether this is caller misuse rather than an invalid token
    pub fn is_misuse(&self) -> bool {
        matches!(self, VerifyError::Misuse(_))
    }
}

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, Error>;

//! Verification stages shared by the blocking and non-blocking parsers
//!
//! Both parsers run the same stages in the same order:
//!
//! ```text
//! algorithm ─▶ provider ─▶ candidates ─▶ signature ─▶ time ─▶ checkers
//! ```
//!
//! Only candidate lookup differs between them. Every stage returns
//! [`VerifyError`], so caller misuse travels through the chain untouched
//! while token failures stay classified.

use crate::algorithm::{SignatureAlgorithm, Verifier, Verifiers};
use crate::checker::{self, Checker, Checkers};
use crate::claims::{StandardClaims, TimeValidator};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, VerifyError};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::token::{Token, codec};
use crate::utils::base64url;
use std::sync::Arc;

/// Configuration read by every verification, never written after build
#[derive(Clone)]
pub(crate) struct Policy {
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) time: TimeValidator,
    pub(crate) checkers: Checkers,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            time: TimeValidator::default(),
            checkers: Vec::new(),
        }
    }
}

impl Policy {
    pub(crate) fn push_checker(&mut self, checker: Arc<dyn Checker>) {
        self.checkers.push(checker);
    }

    /// Time window, then checker chain
    pub(crate) fn check(&self, token: &Token) -> Result<(), VerifyError> {
        self.time.check_bounds()?;
        self.time.validate(token, self.clock.now())?;
        checker::run_all(&self.checkers, token)?;
        Ok(())
    }
}

/// Decode a token string, refusing tokens that carry no signature
pub(crate) fn deserialize(token_string: &str) -> Result<Token, VerifyError> {
    let token = codec::decode(token_string)?;
    token.signed_parts()?;
    Ok(token)
}

/// Fail with `NoVerifier` unless discovery produced at least one candidate
pub(crate) fn require_candidates(
    found: Option<Verifiers>,
    token: &Token,
) -> Result<Verifiers, VerifyError> {
    match found {
        Some(verifiers) if !verifiers.is_empty() => Ok(verifiers),
        _ => Err(Error::NoVerifier {
            issuer: token.issuer().map(ToString::to_string),
            key_id: token.key_id().map(ToString::to_string),
        }
        .into()),
    }
}

/// Unsupported-algorithm failure for an algorithm with no provider
pub(crate) fn unsupported(algorithm: SignatureAlgorithm) -> VerifyError {
    Error::AlgorithmUnsupported(algorithm).into()
}

/// Check the token's own signature against the candidates
pub(crate) fn check_signature(token: &Token, verifiers: &[Arc<dyn Verifier>]) -> Result<(), VerifyError> {
    let (signing_input, signature_b64) = token.signed_parts()?;
    if signature_matches(signing_input, signature_b64, verifiers) {
        Ok(())
    } else {
        Err(Error::SignatureInvalid.into())
    }
}

/// `true` if any candidate accepts the signature
///
/// A signature segment that is not valid Base64URL cannot match any key and
/// is reported as a mismatch, not as a malformed token.
pub(crate) fn signature_matches(
    signing_input: &str,
    signature_b64: &str,
    verifiers: &[Arc<dyn Verifier>],
) -> bool {
    let signature = match base64url::decode_bytes(signature_b64, MAX_DECODED_SIGNATURE_SIZE) {
        Ok(signature) => signature,
        Err(e) => {
            tracing::debug!(error = %e, "Signature segment does not decode");
            return false;
        }
    };

    verifiers.iter().enumerate().any(|(index, verifier)| {
        match verifier.verify(signing_input.as_bytes(), &signature) {
            Ok(()) => true,
            Err(Error::SignatureInvalid) => false,
            Err(e) => {
                tracing::debug!(candidate = index, error = %e, "Verifier failed");
                false
            }
        }
    })
}

/// Log a failed verification at a level matching its family
pub(crate) fn log_failure(error: &VerifyError) {
    match error {
        VerifyError::Misuse(e) => tracing::warn!(error = %e, "Token verification misused"),
        VerifyError::Invalid(e) => tracing::debug!(code = %e.code(), error = %e, "Token rejected"),
    }
}

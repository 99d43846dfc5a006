use crate::algorithm::Verifier;
use crate::checker::Checker;
use crate::claims::{StandardClaims, TimeValidator};
use crate::clock::Clock;
use crate::discovery::AsyncVerifierProviders;
use crate::error::{UsageError, VerifyError};
use crate::pipeline::{self, Policy};
use crate::token::{Token, split_signed_parts};
use std::sync::Arc;

/// Non-blocking token parser and verifier
///
/// Verification is a chain of stages that each either finish at once or wait
/// on discovery. Only candidate lookup ever waits. The returned future runs
/// on whatever executor polls it; clones share configuration, so a parser
/// can be cloned into spawned tasks.
///
/// Failures arrive as [`VerifyError`]: token failures as
/// [`VerifyError::Invalid`] with their classification, caller misuse as
/// [`VerifyError::Misuse`] exactly as the failing stage raised it.
///
/// ```ignore
/// use jsontoken::*;
///
/// let parser = AsyncTokenParser::new(registry).checker(IgnoreAudience);
/// let token = parser.verify_and_deserialize(token_string).await?;
/// ```
#[derive(Clone)]
pub struct AsyncTokenParser {
    providers: Arc<dyn AsyncVerifierProviders>,
    policy: Policy,
}

impl AsyncTokenParser {
    /// Create a parser with the system clock, default skew and no checkers
    pub fn new(providers: impl AsyncVerifierProviders + 'static) -> Self {
        Self {
            providers: Arc::new(providers),
            policy: Policy::default(),
        }
    }

    /// Use `clock` as the source of the current time
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.policy.clock = Arc::new(clock);
        self
    }

    /// Set clock skew tolerance (at most 300 seconds)
    pub fn clock_skew(mut self, seconds: u64) -> Self {
        self.policy.time = TimeValidator::new(seconds);
        self
    }

    /// Append a checker to the chain
    pub fn checker(mut self, checker: impl Checker + 'static) -> Self {
        self.policy.push_checker(Arc::new(checker));
        self
    }

    /// Decode a token string without verifying it
    pub fn deserialize(&self, token_string: &str) -> Result<Token, VerifyError> {
        pipeline::deserialize(token_string).inspect_err(pipeline::log_failure)
    }

    /// Verify a deserialized token, handing it back on success
    #[tracing::instrument(skip_all, fields(iss = token.issuer(), kid = token.key_id()))]
    pub async fn verify(&self, token: Token) -> Result<Token, VerifyError> {
        match self.run(&token).await {
            Ok(()) => Ok(token),
            Err(e) => {
                pipeline::log_failure(&e);
                Err(e)
            }
        }
    }

    /// Deserialize, then verify
    ///
    /// Decode failures surface before discovery is consulted.
    pub async fn verify_and_deserialize(&self, token_string: &str) -> Result<Token, VerifyError> {
        let token = self.deserialize(token_string)?;
        self.verify(token).await
    }

    /// Check a token string's signature against caller-supplied candidates
    ///
    /// Bypasses discovery and never waits.
    pub fn signature_is_valid(
        &self,
        token_string: &str,
        verifiers: &[Arc<dyn Verifier>],
    ) -> Result<bool, UsageError> {
        let (signing_input, signature_b64) = split_signed_parts(token_string)?;
        Ok(pipeline::signature_matches(
            signing_input,
            signature_b64,
            verifiers,
        ))
    }

    /// `true` if issued-at is absent or no later than `now` plus skew
    pub fn issued_at_is_valid(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> bool {
        self.policy.time.issued_at_is_valid(claims, now)
    }

    /// `true` if expiration is absent or no earlier than `now` minus skew
    pub fn expiration_is_valid(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> bool {
        self.policy.time.expiration_is_valid(claims, now)
    }

    async fn run(&self, token: &Token) -> Result<(), VerifyError> {
        let algorithm = token.signature_algorithm()?;

        let provider = self
            .providers
            .provider(algorithm)
            .ok_or_else(|| pipeline::unsupported(algorithm))?;

        let found = provider
            .find_verifier(token.issuer(), token.key_id())
            .await?;
        let verifiers = pipeline::require_candidates(found, token)?;
        tracing::debug!(%algorithm, candidates = verifiers.len(), "Found verifiers");

        pipeline::check_signature(token, &verifiers)?;
        self.policy.check(token)
    }
}

impl std::fmt::Debug for AsyncTokenParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTokenParser")
            .field("clock_skew_seconds", &self.policy.time.clock_skew_seconds())
            .field("checkers", &self.policy.checkers.len())
            .finish_non_exhaustive()
    }
}

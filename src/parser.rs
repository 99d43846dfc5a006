use crate::algorithm::Verifier;
use crate::checker::Checker;
use crate::claims::{StandardClaims, TimeValidator};
use crate::clock::Clock;
use crate::discovery::VerifierProviders;
use crate::error::{UsageError, VerifyError};
use crate::pipeline::{self, Policy};
use crate::token::{Token, split_signed_parts};
use std::sync::Arc;

/// Blocking token parser and verifier
///
/// Configured once, then shared freely: verification reads the
/// configuration and never writes it.
///
/// ```ignore
/// use jsontoken::*;
///
/// let parser = TokenParser::new(registry)
///     .clock_skew(60)
///     .checker(AudienceChecker::new(["http://www.google.com"]));
///
/// let token = parser.verify_and_deserialize(token_string)?;
/// println!("Issuer: {:?}", token.issuer());
/// ```
#[derive(Clone)]
pub struct TokenParser {
    providers: Arc<dyn VerifierProviders>,
    policy: Policy,
}

impl TokenParser {
    /// Create a parser with the system clock, default skew and no checkers
    pub fn new(providers: impl VerifierProviders + 'static) -> Self {
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

    /// Set clock skew tolerance
    ///
    /// # Security
    /// Values above 300 seconds make every verification fail with
    /// [`UsageError::ClockSkewTooLarge`].
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
    ///
    /// Fails with [`UsageError::SignatureMissing`] when the signature segment
    /// is empty.
    pub fn deserialize(&self, token_string: &str) -> Result<Token, VerifyError> {
        pipeline::deserialize(token_string).inspect_err(pipeline::log_failure)
    }

    /// Verify signature, time window and checkers of a deserialized token
    #[tracing::instrument(skip_all, fields(iss = token.issuer(), kid = token.key_id()))]
    pub fn verify(&self, token: &Token) -> Result<(), VerifyError> {
        self.run(token).inspect_err(pipeline::log_failure)
    }

    /// Deserialize, then verify
    pub fn verify_and_deserialize(&self, token_string: &str) -> Result<Token, VerifyError> {
        let token = self.deserialize(token_string)?;
        self.verify(&token)?;
        Ok(token)
    }

    /// Check a token string's signature against caller-supplied candidates
    ///
    /// Bypasses discovery. Returns `Ok(false)` when no candidate accepts the
    /// signature, and a usage error when the string has no signature.
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

    fn run(&self, token: &Token) -> Result<(), VerifyError> {
        let algorithm = token.signature_algorithm()?;

        let provider = self
            .providers
            .provider(algorithm)
            .ok_or_else(|| pipeline::unsupported(algorithm))?;

        let found = provider.find_verifier(token.issuer(), token.key_id())?;
        let verifiers = pipeline::require_candidates(found, token)?;
        tracing::debug!(%algorithm, candidates = verifiers.len(), "Found verifiers");

        pipeline::check_signature(token, &verifiers)?;
        self.policy.check(token)
    }
}

impl std::fmt::Debug for TokenParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenParser")
            .field("clock_skew_seconds", &self.policy.time.clock_skew_seconds())
            .field("checkers", &self.policy.checkers.len())
            .finish_non_exhaustive()
    }
}

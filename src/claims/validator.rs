use crate::claims::StandardClaims;
use crate::error::{Error, Result, UsageError};
use crate::limits::{DEFAULT_CLOCK_SKEW_SECONDS, MAX_CLOCK_SKEW_SECONDS};
use crate::utils::bounds::exceeds_skew;

/// Issued-at / expiration validation with symmetric clock skew
///
/// The skew is applied to each bound independently: a token is accepted up
/// to `skew` seconds before its issued-at and up to `skew` seconds after its
/// expiration. An absent bound imposes no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeValidator {
    clock_skew_seconds: u64,
}

impl Default for TimeValidator {
    fn default() -> Self {
        Self {
            clock_skew_seconds: DEFAULT_CLOCK_SKEW_SECONDS,
        }
    }
}

impl TimeValidator {
    /// Create a validator with the given clock skew tolerance
    ///
    /// # Security
    /// Clock skew is limited to prevent effectively disabling expiration checks.
    /// Values above 300 seconds are rejected by [`TimeValidator::check_bounds`].
    pub fn new(clock_skew_seconds: u64) -> Self {
        Self { clock_skew_seconds }
    }

    pub fn clock_skew_seconds(&self) -> u64 {
        self.clock_skew_seconds
    }

    /// Reject configurations whose skew would disable time checks
    pub fn check_bounds(&self) -> std::result::Result<(), UsageError> {
        if self.clock_skew_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(UsageError::ClockSkewTooLarge {
                value: self.clock_skew_seconds,
                max: MAX_CLOCK_SKEW_SECONDS,
            });
        }
        Ok(())
    }

    /// `true` if issued-at is absent or `issued_at <= now + skew`
    pub fn issued_at_is_valid(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> bool {
        self.check_issued_at(claims, now).is_ok()
    }

    /// `true` if expiration is absent or `expiration >= now - skew`
    pub fn expiration_is_valid(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> bool {
        self.check_expiration(claims, now).is_ok()
    }

    /// Run all time checks, reporting the first failure
    pub fn validate(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> Result<()> {
        if let (Some(iat), Some(exp)) = (claims.issued_at(), claims.expiration())
            && iat > exp
        {
            return Err(Error::TokenTimeRangeInverted {
                issued_at: iat,
                expired_at: exp,
            });
        }

        self.check_issued_at(claims, now)?;
        self.check_expiration(claims, now)
    }

    fn check_issued_at(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> Result<()> {
        if let Some(iat) = claims.issued_at()
            && exceeds_skew(iat, now, self.clock_skew_seconds)
        {
            return Err(Error::TokenIssuedInFuture {
                issued_at: iat,
                now,
                skew: self.clock_skew_seconds,
            });
        }
        Ok(())
    }

    fn check_expiration(&self, claims: &(impl StandardClaims + ?Sized), now: i64) -> Result<()> {
        if let Some(exp) = claims.expiration()
            && exceeds_skew(now, exp, self.clock_skew_seconds)
        {
            return Err(Error::TokenExpired {
                expired_at: exp,
                now,
                skew: self.clock_skew_seconds,
            });
        }
        Ok(())
    }
}

//! Policy checks run after signature and time validation
//!
//! Checkers report failures as [`Error`]. A checker that fails for a reason
//! outside the crate's taxonomy wraps it with [`Error::unknown`], which
//! classifies as [`ErrorCode::Unknown`](crate::error::ErrorCode::Unknown).

use crate::claims::{AUDIENCE, StandardClaims};
use crate::error::{Error, Result};
use crate::token::Token;
use std::sync::Arc;

/// Policy predicate over a verified token
///
/// Checkers must not mutate shared state: one checker instance is shared by
/// every concurrent verification.
pub trait Checker: Send + Sync {
    fn check(&self, token: &Token) -> Result<()>;
}

impl<F> Checker for F
where
    F: Fn(&Token) -> Result<()> + Send + Sync,
{
    fn check(&self, token: &Token) -> Result<()> {
        self(token)
    }
}

/// Ordered checker chain
pub type Checkers = Vec<Arc<dyn Checker>>;

/// Requires the `aud` claim to equal one of the accepted audiences
#[derive(Debug, Clone)]
pub struct AudienceChecker {
    audiences: Vec<String>,
}

impl AudienceChecker {
    pub fn new<I, S>(audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            audiences: audiences.into_iter().map(Into::into).collect(),
        }
    }
}

impl Checker for AudienceChecker {
    fn check(&self, token: &Token) -> Result<()> {
        let audience = token
            .audience()
            .ok_or_else(|| Error::ClaimMissing(AUDIENCE.to_string()))?;

        if self.audiences.iter().any(|accepted| accepted == audience) {
            Ok(())
        } else {
            Err(Error::AudienceMismatch {
                expected: self.audiences.clone(),
                found: audience.to_string(),
            })
        }
    }
}

/// Accepts any audience, including none
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAudience;

impl Checker for IgnoreAudience {
    fn check(&self, _token: &Token) -> Result<()> {
        Ok(())
    }
}

/// Run checkers in order, stopping at the first failure
pub(crate) fn run_all(checkers: &[Arc<dyn Checker>], token: &Token) -> Result<()> {
    checkers.iter().try_for_each(|checker| checker.check(token))
}

//! Verifier discovery
//!
//! Discovery maps a signature algorithm to a provider, and a provider maps
//! `(issuer, key id)` to the candidate verifiers for a token. Issuers publish
//! several keys at once during rotation, so a lookup may return many
//! candidates; a token is accepted if any of them validates the signature.
//!
//! Providers come in a blocking and a non-blocking flavour. Both report "no
//! candidates" as `Ok(None)` or an empty list, which the engines treat alike.

#[cfg(feature = "cache")]
mod caching;
mod registry;
mod fixed;

#[cfg(feature = "cache")]
pub use caching::CachingVerifierProvider;
pub use fixed::{ImmediateProvider, StaticVerifierProvider};
pub use registry::{AsyncVerifierRegistry, ProviderRegistry, VerifierRegistry};

use crate::algorithm::{SignatureAlgorithm, Verifiers};
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;

/// Pending result of an asynchronous verifier lookup
pub type VerifierFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Verifiers>>> + Send + 'a>>;

/// Blocking lookup of candidate verifiers
pub trait VerifierProvider: Send + Sync {
    fn find_verifier(&self, issuer: Option<&str>, key_id: Option<&str>)
    -> Result<Option<Verifiers>>;
}

/// Non-blocking lookup of candidate verifiers
///
/// Implementations that fetch key material remotely should do the I/O inside
/// the returned future, never before returning it.
pub trait AsyncVerifierProvider: Send + Sync {
    fn find_verifier<'a>(
        &'a self,
        issuer: Option<&'a str>,
        key_id: Option<&'a str>,
    ) -> VerifierFuture<'a>;
}

/// Algorithm to blocking provider
///
/// `None` means this configuration does not support the algorithm.
pub trait VerifierProviders: Send + Sync {
    fn provider(&self, algorithm: SignatureAlgorithm) -> Option<&dyn VerifierProvider>;
}

/// Algorithm to non-blocking provider
pub trait AsyncVerifierProviders: Send + Sync {
    fn provider(&self, algorithm: SignatureAlgorithm) -> Option<&dyn AsyncVerifierProvider>;
}

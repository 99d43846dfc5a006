use crate::algorithm::{Verifier, Verifiers};
use crate::discovery::{AsyncVerifierProvider, VerifierFuture, VerifierProvider};
use crate::error::Result;
use std::sync::Arc;

/// In-memory verifier table
///
/// Each entry is scoped to an issuer and key id; an unset scope matches any
/// value, including none. Serves both blocking and non-blocking lookups.
#[derive(Clone, Default)]
pub struct StaticVerifierProvider {
    entries: Vec<Entry>,
}

#[derive(Clone)]
struct Entry {
    issuer: Option<String>,
    key_id: Option<String>,
    verifier: Arc<dyn Verifier>,
}

impl Entry {
    fn matches(&self, issuer: Option<&str>, key_id: Option<&str>) -> bool {
        let scope_matches =
            |scope: &Option<String>, value: Option<&str>| scope.is_none() || scope.as_deref() == value;
        scope_matches(&self.issuer, issuer) && scope_matches(&self.key_id, key_id)
    }
}

impl StaticVerifierProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a verifier for every issuer and key id
    pub fn with_verifier(self, verifier: Arc<dyn Verifier>) -> Self {
        self.with_entry(None, None, verifier)
    }

    /// Add a verifier for one issuer, any key id
    pub fn with_issuer_verifier(self, issuer: impl Into<String>, verifier: Arc<dyn Verifier>) -> Self {
        self.with_entry(Some(issuer.into()), None, verifier)
    }

    /// Add a verifier for one issuer and key id
    pub fn with_key_verifier(
        self,
        issuer: impl Into<String>,
        key_id: impl Into<String>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        self.with_entry(Some(issuer.into()), Some(key_id.into()), verifier)
    }

    fn with_entry(
        mut self,
        issuer: Option<String>,
        key_id: Option<String>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        self.entries.push(Entry {
            issuer,
            key_id,
            verifier,
        });
        self
    }

    fn lookup(&self, issuer: Option<&str>, key_id: Option<&str>) -> Option<Verifiers> {
        let verifiers: Verifiers = self
            .entries
            .iter()
            .filter(|entry| entry.matches(issuer, key_id))
            .map(|entry| Arc::clone(&entry.verifier))
            .collect();

        (!verifiers.is_empty()).then_some(verifiers)
    }
}

impl std::fmt::Debug for StaticVerifierProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticVerifierProvider")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl VerifierProvider for StaticVerifierProvider {
    fn find_verifier(
        &self,
        issuer: Option<&str>,
        key_id: Option<&str>,
    ) -> Result<Option<Verifiers>> {
        Ok(self.lookup(issuer, key_id))
    }
}

impl AsyncVerifierProvider for StaticVerifierProvider {
    fn find_verifier<'a>(
        &'a self,
        issuer: Option<&'a str>,
        key_id: Option<&'a str>,
    ) -> VerifierFuture<'a> {
        let verifiers = self.lookup(issuer, key_id);
        Box::pin(std::future::ready(Ok(verifiers)))
    }
}

/// Serves a blocking provider through the non-blocking interface
///
/// The lookup runs when the future is first polled, on whatever thread polls
/// it. Only suitable for providers that do not actually block.
#[derive(Debug, Clone)]
pub struct ImmediateProvider<P>(pub P);

impl<P: VerifierProvider> AsyncVerifierProvider for ImmediateProvider<P> {
    fn find_verifier<'a>(
        &'a self,
        issuer: Option<&'a str>,
        key_id: Option<&'a str>,
    ) -> VerifierFuture<'a> {
        Box::pin(async move { self.0.find_verifier(issuer, key_id) })
    }
}

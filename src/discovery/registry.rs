use crate::algorithm::SignatureAlgorithm;
use crate::discovery::{
    AsyncVerifierProvider, AsyncVerifierProviders, VerifierProvider, VerifierProviders,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Provider per algorithm
///
/// `P` is the provider trait object: [`VerifierRegistry`] for blocking
/// providers, [`AsyncVerifierRegistry`] for non-blocking ones.
pub struct ProviderRegistry<P: ?Sized> {
    providers: HashMap<SignatureAlgorithm, Arc<P>>,
}

/// Registry of blocking providers
pub type VerifierRegistry = ProviderRegistry<dyn VerifierProvider>;

/// Registry of non-blocking providers
pub type AsyncVerifierRegistry = ProviderRegistry<dyn AsyncVerifierProvider>;

impl<P: ?Sized> ProviderRegistry<P> {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register the provider for an algorithm, replacing any previous one
    pub fn with(mut self, algorithm: SignatureAlgorithm, provider: Arc<P>) -> Self {
        self.providers.insert(algorithm, provider);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<P: ?Sized> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> Clone for ProviderRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            providers: self.providers.clone(),
        }
    }
}

impl<P: ?Sized> std::fmt::Debug for ProviderRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("algorithms", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VerifierProviders for VerifierRegistry {
    fn provider(&self, algorithm: SignatureAlgorithm) -> Option<&dyn VerifierProvider> {
        self.providers.get(&algorithm).map(|provider| provider.as_ref())
    }
}

impl AsyncVerifierProviders for AsyncVerifierRegistry {
    fn provider(&self, algorithm: SignatureAlgorithm) -> Option<&dyn AsyncVerifierProvider> {
        self.providers.get(&algorithm).map(|provider| provider.as_ref())
    }
}

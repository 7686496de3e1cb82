use crate::models::quote::QuoteKind;

use super::frankfurter::FrankfurterProvider;
use super::traits::QuoteProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of available quote providers, in priority order.
///
/// Requests are routed by [`QuoteKind`]; when several providers serve the
/// same kind, earlier registrations are tried first.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers.
    ///
    /// Yahoo Finance serves everything (native targets only); Frankfurter
    /// is the forex fallback.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance provider unavailable: {e}"),
            }
        }

        registry.register(Box::new(FrankfurterProvider::new()));

        registry
    }

    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        log::debug!("Registered quote provider {}", provider.name());
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First provider that supports the given kind.
    pub fn get_provider_for(&self, kind: &QuoteKind) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_kinds().contains(kind))
            .map(|p| p.as_ref())
    }

    /// All providers that support the given kind, in registration order.
    pub fn get_providers_for(&self, kind: &QuoteKind) -> Vec<&dyn QuoteProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_kinds().contains(kind))
            .map(|p| p.as_ref())
            .collect()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

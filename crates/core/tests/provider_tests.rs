// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry routing, Yahoo symbol mapping, Frankfurter
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;

use portfolio_dashboard_core::errors::CoreError;
use portfolio_dashboard_core::models::quote::{PriceQuote, PricePoint, QuoteKind};
use portfolio_dashboard_core::providers::frankfurter::FrankfurterProvider;
use portfolio_dashboard_core::providers::registry::QuoteProviderRegistry;
use portfolio_dashboard_core::providers::traits::QuoteProvider;
use portfolio_dashboard_core::providers::yahoo_finance::YahooFinanceProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider that supports only the specified quote kinds.
struct MockProvider {
    name: String,
    kinds: Vec<QuoteKind>,
}

impl MockProvider {
    fn new(name: &str, kinds: Vec<QuoteKind>) -> Self {
        Self {
            name: name.to_string(),
            kinds,
        }
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_kinds(&self) -> Vec<QuoteKind> {
        self.kinds.clone()
    }

    async fn get_current_quote(&self, symbol: &str, kind: &QuoteKind) -> Result<PriceQuote, CoreError> {
        Ok(PriceQuote::new(symbol, 100.0, "USD", kind.quote_type()))
    }

    async fn get_price_range(
        &self,
        _symbol: &str,
        _kind: &QuoteKind,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![])
    }
}

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn empty_registry_has_no_providers() {
        let registry = QuoteProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_provider_for(&QuoteKind::Stock).is_none());
        assert!(registry.get_providers_for(&QuoteKind::Forex).is_empty());
    }

    #[test]
    fn routes_by_kind() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("Stocks", vec![QuoteKind::Stock])));
        registry.register(Box::new(MockProvider::new("Fx", vec![QuoteKind::Forex])));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_provider_for(&QuoteKind::Stock).unwrap().name(), "Stocks");
        assert_eq!(registry.get_provider_for(&QuoteKind::Forex).unwrap().name(), "Fx");
        assert!(registry.get_provider_for(&QuoteKind::Crypto).is_none());
    }

    #[test]
    fn earlier_registration_wins() {
        let mut registry = QuoteProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("Primary", vec![QuoteKind::Forex])));
        registry.register(Box::new(MockProvider::new("Fallback", vec![QuoteKind::Forex])));

        assert_eq!(registry.get_provider_for(&QuoteKind::Forex).unwrap().name(), "Primary");
        let names: Vec<&str> = registry
            .get_providers_for(&QuoteKind::Forex)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, ["Primary", "Fallback"]);
    }

    #[test]
    fn defaults_cover_every_kind() {
        let registry = QuoteProviderRegistry::new_with_defaults();
        for kind in [QuoteKind::Stock, QuoteKind::Crypto, QuoteKind::Index, QuoteKind::Forex] {
            assert!(registry.get_provider_for(&kind).is_some(), "no provider for {kind}");
        }
    }

    #[test]
    fn defaults_put_frankfurter_behind_yahoo_for_forex() {
        let registry = QuoteProviderRegistry::new_with_defaults();
        let names: Vec<&str> = registry
            .get_providers_for(&QuoteKind::Forex)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names.last(), Some(&"Frankfurter"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Yahoo Finance symbol mapping (no network)
// ═══════════════════════════════════════════════════════════════════

mod yahoo {
    use super::*;

    #[test]
    fn stocks_and_indices_pass_through_uppercased() {
        assert_eq!(YahooFinanceProvider::yahoo_symbol("aapl", &QuoteKind::Stock), "AAPL");
        assert_eq!(YahooFinanceProvider::yahoo_symbol("005930.ks", &QuoteKind::Stock), "005930.KS");
        assert_eq!(YahooFinanceProvider::yahoo_symbol("^gspc", &QuoteKind::Index), "^GSPC");
    }

    #[test]
    fn bare_crypto_gets_usd_pair() {
        assert_eq!(YahooFinanceProvider::yahoo_symbol("btc", &QuoteKind::Crypto), "BTC-USD");
        assert_eq!(YahooFinanceProvider::yahoo_symbol("ETH-KRW", &QuoteKind::Crypto), "ETH-KRW");
    }

    #[test]
    fn forex_pair_becomes_yahoo_currency_symbol() {
        assert_eq!(YahooFinanceProvider::yahoo_symbol("USD/KRW", &QuoteKind::Forex), "USDKRW=X");
        assert_eq!(YahooFinanceProvider::yahoo_symbol("usdkrw=x", &QuoteKind::Forex), "USDKRW=X");
    }

    #[test]
    fn currency_inference() {
        assert_eq!(YahooFinanceProvider::infer_currency("005930.KS", &QuoteKind::Stock), "KRW");
        assert_eq!(YahooFinanceProvider::infer_currency("035720.KQ", &QuoteKind::Stock), "KRW");
        assert_eq!(YahooFinanceProvider::infer_currency("AAPL", &QuoteKind::Stock), "USD");
        assert_eq!(YahooFinanceProvider::infer_currency("BTC-USD", &QuoteKind::Crypto), "USD");
        assert_eq!(YahooFinanceProvider::infer_currency("ETH-KRW", &QuoteKind::Crypto), "KRW");
        assert_eq!(YahooFinanceProvider::infer_currency("^KS11", &QuoteKind::Index), "KRW");
        assert_eq!(YahooFinanceProvider::infer_currency("^GSPC", &QuoteKind::Index), "USD");
        assert_eq!(YahooFinanceProvider::infer_currency("USDKRW=X", &QuoteKind::Forex), "KRW");
    }

    #[test]
    fn serves_every_kind() {
        let yahoo = YahooFinanceProvider::new().unwrap();
        assert_eq!(yahoo.name(), "Yahoo Finance");
        assert_eq!(yahoo.supported_kinds().len(), 4);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Frankfurter (paths that never reach the network)
// ═══════════════════════════════════════════════════════════════════

mod frankfurter {
    use super::*;

    #[test]
    fn serves_only_forex() {
        let provider = FrankfurterProvider::new();
        assert_eq!(provider.name(), "Frankfurter");
        assert_eq!(provider.supported_kinds(), vec![QuoteKind::Forex]);
    }

    #[tokio::test]
    async fn same_currency_is_one() {
        let provider = FrankfurterProvider::new();
        let quote = provider
            .get_current_quote("KRW/KRW", &QuoteKind::Forex)
            .await
            .unwrap();
        assert_eq!(quote.price, 1.0);
        assert_eq!(quote.currency, "KRW");
        assert_eq!(quote.quote_type, "CURRENCY");
    }

    #[tokio::test]
    async fn same_currency_range_is_flat() {
        let provider = FrankfurterProvider::new();
        let points = provider
            .get_price_range("USD/USD", &QuoteKind::Forex, make_date(2025, 1, 1), make_date(2025, 1, 5))
            .await
            .unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.price == 1.0));
        assert_eq!(points[0].date, make_date(2025, 1, 1));
    }

    #[tokio::test]
    async fn rejects_non_pair_symbol() {
        let provider = FrankfurterProvider::new();
        let err = provider
            .get_current_quote("USDKRW", &QuoteKind::Forex)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn rejects_non_forex_kind() {
        let provider = FrankfurterProvider::new();
        let err = provider
            .get_current_quote("AAPL", &QuoteKind::Stock)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoProvider(_)));
    }
}

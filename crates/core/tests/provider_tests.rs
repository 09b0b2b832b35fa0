// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, brapi response parsing, Yahoo symbols, sync
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;

use dividend_planner_core::errors::CoreError;
use dividend_planner_core::models::settings::Settings;
use dividend_planner_core::providers::brapi::BrapiProvider;
use dividend_planner_core::providers::registry::PriceProviderRegistry;
use dividend_planner_core::providers::traits::PriceProvider;
use dividend_planner_core::providers::yahoo_finance::YahooFinanceProvider;
use dividend_planner_core::sync::remote::{HttpRemoteSync, SAVES_KEY};

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockProvider {
    name: String,
}

impl MockProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_current_price(&self, _symbol: &str) -> Result<f64, CoreError> {
        Ok(100.0)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_is_empty() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.providers().is_empty());
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = PriceProviderRegistry::default();
        registry.register(Box::new(MockProvider::new("first")));
        registry.register(Box::new(MockProvider::new("second")));
        assert_eq!(registry.provider_names(), vec!["first", "second"]);
        assert_eq!(registry.providers()[1].name(), "second");
    }

    #[test]
    fn defaults_put_brapi_first() {
        let registry = PriceProviderRegistry::new_with_defaults(&Settings::default());
        let names = registry.provider_names();
        assert_eq!(names.first().map(String::as_str), Some("brapi"));
        assert!(names.len() <= 2);
    }

    #[tokio::test]
    async fn registered_provider_answers() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("mock")));
        let price = registry.providers()[0].get_current_price("ANY").await.unwrap();
        assert_eq!(price, 100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// brapi
// ═══════════════════════════════════════════════════════════════════

mod brapi {
    use super::*;

    #[test]
    fn parses_regular_market_price() {
        let body = r#"{
            "results": [
                { "symbol": "MXRF11", "currency": "BRL", "regularMarketPrice": 10.31 }
            ],
            "requestedAt": "2025-01-15T12:00:00.000Z",
            "took": "0ms"
        }"#;
        let price = BrapiProvider::parse_quote_response(body, "MXRF11").unwrap();
        assert_eq!(price, 10.31);
    }

    #[test]
    fn missing_price_field_is_an_error() {
        let body = r#"{ "results": [ { "symbol": "MXRF11" } ] }"#;
        let err = BrapiProvider::parse_quote_response(body, "MXRF11").unwrap_err();
        assert!(matches!(err, CoreError::Api { ref provider, .. } if provider == "brapi"));
    }

    #[test]
    fn empty_results_is_an_error() {
        let body = r#"{ "results": [] }"#;
        assert!(BrapiProvider::parse_quote_response(body, "MXRF11").is_err());
        let body = r#"{}"#;
        assert!(BrapiProvider::parse_quote_response(body, "MXRF11").is_err());
    }

    #[test]
    fn error_payload_is_reported() {
        let body = r#"{ "error": true, "message": "Não encontramos a ação XXXX11" }"#;
        let err = BrapiProvider::parse_quote_response(body, "XXXX11").unwrap_err();
        assert!(err.to_string().contains("Não encontramos"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = BrapiProvider::parse_quote_response("<html>", "MXRF11").unwrap_err();
        assert!(err.is_lookup_error());
    }

    #[test]
    fn name() {
        let provider = BrapiProvider::new(None, 5);
        assert_eq!(provider.name(), "brapi");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Yahoo Finance
// ═══════════════════════════════════════════════════════════════════

mod yahoo {
    use super::*;

    #[test]
    fn appends_exchange_suffix_to_bare_tickers() {
        let provider = YahooFinanceProvider::new(Some(".SA".into())).unwrap();
        assert_eq!(provider.yahoo_symbol("mxrf11"), "MXRF11.SA");
        assert_eq!(provider.yahoo_symbol(" HGLG11 "), "HGLG11.SA");
    }

    #[test]
    fn keeps_explicit_suffix() {
        let provider = YahooFinanceProvider::new(Some(".SA".into())).unwrap();
        assert_eq!(provider.yahoo_symbol("O.N"), "O.N");
    }

    #[test]
    fn no_suffix_configured() {
        let provider = YahooFinanceProvider::new(None).unwrap();
        assert_eq!(provider.yahoo_symbol("aapl"), "AAPL");
        let provider = YahooFinanceProvider::new(Some("  ".into())).unwrap();
        assert_eq!(provider.yahoo_symbol("aapl"), "AAPL");
        assert_eq!(provider.name(), "Yahoo Finance");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Remote sync endpoint
// ═══════════════════════════════════════════════════════════════════

mod remote_sync {
    use super::*;

    #[test]
    fn endpoint_uses_fixed_key() {
        let sync = HttpRemoteSync::new("https://demo.firebaseio.com/", None, 10);
        assert_eq!(sync.endpoint(), "https://demo.firebaseio.com/saves.json");
        assert_eq!(SAVES_KEY, "saves");
    }
}

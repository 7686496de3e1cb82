// ═══════════════════════════════════════════════════════════════════
// Model Tests — ticker normalization, trade ingestion, quotes, settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use portfolio_dashboard_core::errors::CoreError;
use portfolio_dashboard_core::models::ledger::Ledger;
use portfolio_dashboard_core::models::quote::{fx_pair, split_fx_pair, PriceQuote, QuoteKind};
use portfolio_dashboard_core::models::settings::Settings;
use portfolio_dashboard_core::models::ticker::{has_regional_suffix, normalize_ticker, regional_candidates};
use portfolio_dashboard_core::models::trade::{parse_trades, Account, AssetClass, Trade, TradeType};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Ticker normalization
// ═══════════════════════════════════════════════════════════════════

mod ticker {
    use super::*;

    #[test]
    fn strips_kospi_and_kosdaq_suffixes() {
        assert_eq!(normalize_ticker("005930.KS"), "005930");
        assert_eq!(normalize_ticker("035720.KQ"), "035720");
    }

    #[test]
    fn suffixed_and_bare_forms_are_equal() {
        assert_eq!(normalize_ticker("005930.KS"), normalize_ticker("005930"));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(normalize_ticker("aapl"), "AAPL");
        assert_eq!(normalize_ticker("005930.ks"), "005930");
    }

    #[test]
    fn idempotent() {
        for t in ["005930.KS", "aapl", " btc-usd ", "035720.kq", "^GSPC"] {
            let once = normalize_ticker(t);
            assert_eq!(normalize_ticker(&once), once);
        }
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize_ticker("  MSFT \n"), "MSFT");
    }

    #[test]
    fn other_suffixes_are_kept() {
        assert_eq!(normalize_ticker("7203.T"), "7203.T");
        assert_eq!(normalize_ticker("BTC-USD"), "BTC-USD");
    }

    #[test]
    fn strips_only_one_suffix() {
        assert_eq!(normalize_ticker("ABC.KS.KQ"), "ABC.KS");
    }

    #[test]
    fn detects_regional_suffix() {
        assert!(has_regional_suffix("005930.ks"));
        assert!(!has_regional_suffix("005930"));
    }

    #[test]
    fn candidates_for_bare_ticker_try_both_exchanges() {
        assert_eq!(
            regional_candidates("005930"),
            vec!["005930", "005930.KS", "005930.KQ"]
        );
    }

    #[test]
    fn candidates_for_suffixed_ticker_are_itself() {
        assert_eq!(regional_candidates("035720.kq"), vec!["035720.KQ"]);
    }

    #[test]
    fn candidates_for_special_symbols_are_itself() {
        assert_eq!(regional_candidates("BTC-USD"), vec!["BTC-USD"]);
        assert_eq!(regional_candidates("^KS11"), vec!["^KS11"]);
        assert_eq!(regional_candidates("KRW=X"), vec!["KRW=X"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trade construction & validation
// ═══════════════════════════════════════════════════════════════════

mod trade {
    use super::*;

    #[test]
    fn new_uppercases_ticker_and_defaults_account() {
        let t = Trade::buy(" aapl ", AssetClass::UsStock, 150.0, 1.0, make_date(2025, 1, 1));
        assert_eq!(t.ticker, "AAPL");
        assert_eq!(t.account, Account::General);
        assert_eq!(t.trade_type, TradeType::Buy);
        assert!(t.name.is_none());
    }

    #[test]
    fn signed_quantity() {
        let d = make_date(2025, 1, 1);
        assert_eq!(Trade::buy("A", AssetClass::UsStock, 1.0, 3.0, d).signed_quantity(), 3.0);
        assert_eq!(Trade::sell("A", AssetClass::UsStock, 1.0, 3.0, d).signed_quantity(), -3.0);
    }

    #[test]
    fn normalized_ticker_strips_suffix() {
        let t = Trade::buy("005930.KS", AssetClass::DomesticStock, 1.0, 1.0, make_date(2025, 1, 1));
        assert_eq!(t.ticker, "005930.KS");
        assert_eq!(t.normalized_ticker(), "005930");
    }

    #[test]
    fn validate_accepts_zero_price() {
        let t = Trade::buy("GIFT", AssetClass::DomesticStock, 0.0, 1.0, make_date(2025, 1, 1));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_ticker() {
        let t = Trade::buy("   ", AssetClass::UsStock, 1.0, 1.0, make_date(2025, 1, 1));
        assert!(matches!(t.validate(), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn validate_rejects_bad_numbers() {
        let d = make_date(2025, 1, 1);
        for (price, qty) in [(-1.0, 1.0), (f64::NAN, 1.0), (1.0, 0.0), (1.0, -2.0), (1.0, f64::INFINITY)] {
            let t = Trade::buy("X", AssetClass::UsStock, price, qty, d);
            assert!(
                matches!(t.validate(), Err(CoreError::ValidationError(_))),
                "price={price} qty={qty} should be rejected"
            );
        }
    }

    #[test]
    fn asset_class_currency_treatment() {
        assert!(!AssetClass::DomesticStock.is_foreign_currency());
        assert!(AssetClass::UsStock.is_foreign_currency());
        assert!(AssetClass::Crypto.is_foreign_currency());
    }

    #[test]
    fn display_strings() {
        assert_eq!(AssetClass::UsStock.to_string(), "US Stock");
        assert_eq!(AssetClass::DomesticStock.to_string(), "Domestic Stock");
        assert_eq!(Account::Irp.to_string(), "IRP");
        assert_eq!(TradeType::Sell.to_string(), "Sell");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trade ingestion (JSON boundary)
// ═══════════════════════════════════════════════════════════════════

mod ingestion {
    use super::*;

    #[test]
    fn parses_document_store_shape() {
        let json = r#"[
            {"ticker":"AAPL","type":"Buy","assetClass":"US Stock","account":"General",
             "price":150,"quantity":1,"date":"2025-01-15"},
            {"ticker":"005930.KS","type":"Sell","assetClass":"Domestic Stock","account":"IRP",
             "price":70000,"quantity":2,"date":"2025-02-01","name":"Samsung Electronics"}
        ]"#;
        let trades = parse_trades(json).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].asset_class, AssetClass::UsStock);
        assert_eq!(trades[0].date, make_date(2025, 1, 15));
        assert_eq!(trades[1].trade_type, TradeType::Sell);
        assert_eq!(trades[1].account, Account::Irp);
        assert_eq!(trades[1].name.as_deref(), Some("Samsung Electronics"));
        assert_ne!(trades[0].id, trades[1].id);
    }

    #[test]
    fn missing_account_defaults_to_general() {
        let json = r#"[{"ticker":"BTC","type":"Buy","assetClass":"Crypto",
                        "price":40000,"quantity":0.1,"date":"2025-01-01"}]"#;
        let trades = parse_trades(json).unwrap();
        assert_eq!(trades[0].account, Account::General);
    }

    #[test]
    fn accepts_compact_asset_class_aliases() {
        let json = r#"[{"ticker":"AAPL","type":"Buy","assetClass":"USStock",
                        "price":1,"quantity":1,"date":"2025-01-01"},
                       {"ticker":"005930","type":"Buy","assetClass":"DomesticStock",
                        "price":1,"quantity":1,"date":"2025-01-01"}]"#;
        let trades = parse_trades(json).unwrap();
        assert_eq!(trades[0].asset_class, AssetClass::UsStock);
        assert_eq!(trades[1].asset_class, AssetClass::DomesticStock);
    }

    #[test]
    fn keeps_supplied_id() {
        let json = r#"[{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","ticker":"AAPL","type":"Buy",
                        "assetClass":"US Stock","price":1,"quantity":1,"date":"2025-01-01"}]"#;
        let trades = parse_trades(json).unwrap();
        assert_eq!(trades[0].id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn blank_name_becomes_none() {
        let json = r#"[{"ticker":"AAPL","type":"Buy","assetClass":"US Stock",
                        "price":1,"quantity":1,"date":"2025-01-01","name":"  "}]"#;
        assert!(parse_trades(json).unwrap()[0].name.is_none());
    }

    #[test]
    fn rejects_unknown_trade_type() {
        let json = r#"[{"ticker":"AAPL","type":"Short","assetClass":"US Stock",
                        "price":1,"quantity":1,"date":"2025-01-01"}]"#;
        assert!(matches!(parse_trades(json), Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn rejects_unknown_asset_class() {
        let json = r#"[{"ticker":"AAPL","type":"Buy","assetClass":"Bond",
                        "price":1,"quantity":1,"date":"2025-01-01"}]"#;
        assert!(parse_trades(json).is_err());
    }

    #[test]
    fn rejects_missing_price() {
        let json = r#"[{"ticker":"AAPL","type":"Buy","assetClass":"US Stock",
                        "quantity":1,"date":"2025-01-01"}]"#;
        assert!(parse_trades(json).is_err());
    }

    #[test]
    fn rejects_negative_quantity_with_message() {
        let json = r#"[{"ticker":"AAPL","type":"Buy","assetClass":"US Stock",
                        "price":1,"quantity":-5,"date":"2025-01-01"}]"#;
        let err = parse_trades(json).unwrap_err();
        assert!(err.to_string().contains("Quantity"), "unexpected: {err}");
    }

    #[test]
    fn rejects_empty_ticker() {
        let json = r#"[{"ticker":"","type":"Buy","assetClass":"US Stock",
                        "price":1,"quantity":1,"date":"2025-01-01"}]"#;
        assert!(parse_trades(json).is_err());
    }

    #[test]
    fn serialized_trade_reads_back_equal() {
        let trade = Trade::buy("AAPL", AssetClass::UsStock, 150.0, 2.0, make_date(2025, 3, 1))
            .in_account(Account::Pension)
            .with_name("Apple");
        let json = serde_json::to_string(&trade).unwrap();

        assert!(json.contains("\"type\":\"Buy\""));
        assert!(json.contains("\"assetClass\":\"US Stock\""));
        assert_eq!(serde_json::from_str::<Trade>(&json).unwrap(), trade);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Quotes
// ═══════════════════════════════════════════════════════════════════

mod quote {
    use super::*;

    #[test]
    fn failed_quote_has_no_usable_price() {
        let q = PriceQuote::failed("AAPL", "boom");
        assert!(q.is_error());
        assert_eq!(q.usable_price(), None);
    }

    #[test]
    fn negative_price_is_not_usable() {
        let q = PriceQuote::new("AAPL", -5.0, "USD", "EQUITY");
        assert_eq!(q.usable_price(), None);
        assert_eq!(PriceQuote::new("AAPL", 0.0, "USD", "EQUITY").usable_price(), Some(0.0));
    }

    #[test]
    fn nan_price_is_not_usable() {
        let q = PriceQuote::new("AAPL", f64::NAN, "USD", "EQUITY");
        assert_eq!(q.usable_price(), None);
    }

    #[test]
    fn normalized_ticker() {
        assert_eq!(PriceQuote::new("005930.KS", 1.0, "KRW", "EQUITY").normalized_ticker(), "005930");
    }

    #[test]
    fn deserializes_minimal_quote() {
        let q: PriceQuote = serde_json::from_str(r#"{"ticker":"AAPL","price":160}"#).unwrap();
        assert_eq!(q.price, 160.0);
        assert!(!q.is_error());
        assert!(q.currency.is_empty());
    }

    #[test]
    fn kind_from_asset_class() {
        assert_eq!(QuoteKind::from(AssetClass::DomesticStock), QuoteKind::Stock);
        assert_eq!(QuoteKind::from(AssetClass::UsStock), QuoteKind::Stock);
        assert_eq!(QuoteKind::from(AssetClass::Crypto), QuoteKind::Crypto);
    }

    #[test]
    fn fx_pair_helpers() {
        assert_eq!(fx_pair("usd", "krw"), "USD/KRW");
        assert_eq!(split_fx_pair("USD/KRW"), Some(("USD".into(), "KRW".into())));
        assert_eq!(split_fx_pair("USDKRW"), None);
        assert_eq!(split_fx_pair("/KRW"), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings & Ledger
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.home_currency, "KRW");
        assert_eq!(s.foreign_currency, "USD");
        assert_eq!(s.fallback_exchange_rate, 1.0);
        assert_eq!(s.macro_cache_ttl_hours, 12);
        assert_eq!(s.undervalued_threshold_pct, 30.0);
        assert!(!s.macro_indicators.is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"homeCurrency":"USD"}"#).unwrap();
        assert_eq!(s.home_currency, "USD");
        assert_eq!(s.macro_cache_ttl_hours, 12);
    }

    #[test]
    fn ledger_without_settings_or_targets_loads() {
        let ledger: Ledger = serde_json::from_str(r#"{"trades":[]}"#).unwrap();
        assert_eq!(ledger.settings, Settings::default());
        assert!(ledger.valuation_targets.is_empty());
    }
}

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use crate::errors::CoreError;
use crate::models::quote::{split_fx_pair, PriceQuote, PricePoint, QuoteKind};
use super::traits::QuoteProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance provider for equities, crypto, indices and FX.
///
/// - **Free**: no API key required.
/// - **Coverage**: KOSPI/KOSDAQ (`.KS`/`.KQ`), US listings, `BTC-USD` style
///   crypto pairs, `^` indices and `XXXYYY=X` currency pairs.
///
/// Uses the `yahoo_finance_api` crate. Not WASM-compatible.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Map a symbol to the form Yahoo expects.
    ///
    /// `BTC` → `BTC-USD`, `USD/KRW` → `USDKRW=X`; stocks and indices pass through.
    pub fn yahoo_symbol(symbol: &str, kind: &QuoteKind) -> String {
        let upper = symbol.trim().to_uppercase();
        match kind {
            QuoteKind::Crypto if !upper.contains('-') => format!("{upper}-USD"),
            QuoteKind::Forex => match split_fx_pair(&upper) {
                Some((base, quote)) => format!("{base}{quote}=X"),
                None => upper,
            },
            _ => upper,
        }
    }

    /// Currency a Yahoo symbol is priced in.
    pub fn infer_currency(yahoo_symbol: &str, kind: &QuoteKind) -> String {
        match kind {
            QuoteKind::Stock => {
                if yahoo_symbol.ends_with(".KS") || yahoo_symbol.ends_with(".KQ") {
                    "KRW".into()
                } else {
                    "USD".into()
                }
            }
            QuoteKind::Crypto => yahoo_symbol
                .rsplit_once('-')
                .map(|(_, quote)| quote.to_string())
                .unwrap_or_else(|| "USD".into()),
            QuoteKind::Index => match yahoo_symbol {
                "^KS11" | "^KQ11" | "^KS200" => "KRW".into(),
                _ => "USD".into(),
            },
            QuoteKind::Forex => yahoo_symbol
                .strip_suffix("=X")
                .filter(|pair| pair.len() == 6)
                .map(|pair| pair[3..].to_string())
                .unwrap_or_else(|| "USD".into()),
        }
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: String| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid date {date}: {e}"),
        };
        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(e.to_string()))?
            .with_hms(0, 0, 0)
            .map_err(|e| invalid(e.to_string()))?
            .assume_utc();
        Ok(odt)
    }

    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_kinds(&self) -> Vec<QuoteKind> {
        vec![
            QuoteKind::Stock,
            QuoteKind::Crypto,
            QuoteKind::Index,
            QuoteKind::Forex,
        ]
    }

    async fn get_current_quote(
        &self,
        symbol: &str,
        kind: &QuoteKind,
    ) -> Result<PriceQuote, CoreError> {
        let yahoo_symbol = Self::yahoo_symbol(symbol, kind);
        let resp = self
            .connector
            .get_latest_quotes(&yahoo_symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {yahoo_symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No quote data for {yahoo_symbol}: {e}"),
        })?;

        Ok(PriceQuote::new(
            symbol,
            quote.close,
            Self::infer_currency(&yahoo_symbol, kind),
            kind.quote_type(),
        ))
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        kind: &QuoteKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let yahoo_symbol = Self::yahoo_symbol(symbol, kind);
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(&yahoo_symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch history for {yahoo_symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {yahoo_symbol}: {e}"),
        })?;

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                (date >= from && date <= to).then_some(PricePoint {
                    date,
                    price: q.close,
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        Ok(points)
    }
}

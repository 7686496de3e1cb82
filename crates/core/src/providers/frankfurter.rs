use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{split_fx_pair, PriceQuote, PricePoint, QuoteKind};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";
const PROVIDER: &str = "Frankfurter";

/// Frankfurter API provider for fiat exchange rates (ECB reference data).
///
/// Free, no API key. Serves only [`QuoteKind::Forex`] with `"BASE/QUOTE"`
/// symbols, e.g. `"USD/KRW"`.
pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    fn parse_pair(symbol: &str) -> Result<(String, String), CoreError> {
        split_fx_pair(symbol).ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Expected a BASE/QUOTE currency pair, got {symbol}"),
        })
    }

    fn ensure_forex(kind: &QuoteKind) -> Result<(), CoreError> {
        if *kind == QuoteKind::Forex {
            Ok(())
        } else {
            Err(CoreError::NoProvider(kind.to_string()))
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    rates: HashMap<String, HashMap<String, f64>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_kinds(&self) -> Vec<QuoteKind> {
        vec![QuoteKind::Forex]
    }

    async fn get_current_quote(
        &self,
        symbol: &str,
        kind: &QuoteKind,
    ) -> Result<PriceQuote, CoreError> {
        Self::ensure_forex(kind)?;
        let (base, target) = Self::parse_pair(symbol)?;

        if base == target {
            return Ok(PriceQuote::new(symbol, 1.0, target, kind.quote_type()));
        }

        let url = format!("{BASE_URL}/latest?base={base}&symbols={target}");

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse response for {base}/{target}: {e}"),
            })?;

        let rate = resp.rates.get(&target).copied().ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No rate found for {base} → {target}"),
        })?;

        Ok(PriceQuote::new(symbol, rate, target, kind.quote_type()))
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        kind: &QuoteKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Self::ensure_forex(kind)?;
        let (base, target) = Self::parse_pair(symbol)?;

        if base == target {
            let points = from
                .iter_days()
                .take_while(|d| *d <= to)
                .map(|date| PricePoint { date, price: 1.0 })
                .collect();
            return Ok(points);
        }

        let from_str = from.format("%Y-%m-%d");
        let to_str = to.format("%Y-%m-%d");
        let url = format!("{BASE_URL}/{from_str}..{to_str}?base={base}&symbols={target}");

        let resp: TimeSeriesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse time series for {base}/{target}: {e}"),
            })?;

        let mut points: Vec<PricePoint> = resp
            .rates
            .iter()
            .filter_map(|(date_str, rates)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
                let price = rates.get(&target)?;
                Some(PricePoint { date, price: *price })
            })
            .collect();

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

use crate::errors::CoreError;
use crate::models::market::StockListing;
use crate::models::ticker::normalize_ticker;

/// Searches a catalog of known listings by ticker or name.
///
/// Constructed from its catalog and handed to whoever needs it; there is
/// no process-wide instance.
pub struct StockSearchService {
    listings: Vec<IndexedListing>,
}

struct IndexedListing {
    listing: StockListing,
    ticker_key: String,
    name_key: String,
}

impl StockSearchService {
    pub fn new(listings: Vec<StockListing>) -> Self {
        let listings = listings
            .into_iter()
            .map(|listing| IndexedListing {
                ticker_key: normalize_ticker(&listing.ticker),
                name_key: listing.name.to_lowercase(),
                listing,
            })
            .collect();
        Self { listings }
    }

    /// Build from a JSON array of `{ticker, name, market}` objects.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let listings: Vec<StockListing> = serde_json::from_str(json)?;
        Ok(Self::new(listings))
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Case-insensitive search, best matches first, at most `limit` results.
    ///
    /// Ranking: exact ticker, ticker prefix, name prefix, name substring.
    /// Ties keep catalog order. A blank query returns nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&StockListing> {
        let ticker_query = normalize_ticker(query);
        let name_query = query.trim().to_lowercase();
        if name_query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &StockListing)> = self
            .listings
            .iter()
            .filter_map(|entry| {
                let rank = if entry.ticker_key == ticker_query {
                    0
                } else if entry.ticker_key.starts_with(&ticker_query) {
                    1
                } else if entry.name_key.starts_with(&name_query) {
                    2
                } else if entry.name_key.contains(&name_query) {
                    3
                } else {
                    return None;
                };
                Some((rank, &entry.listing))
            })
            .collect();

        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().take(limit).map(|(_, l)| l).collect()
    }

    /// Exact lookup by ticker, ignoring regional suffix and case.
    pub fn find(&self, ticker: &str) -> Option<&StockListing> {
        let key = normalize_ticker(ticker);
        self.listings
            .iter()
            .find(|entry| entry.ticker_key == key)
            .map(|entry| &entry.listing)
    }
}

impl Default for StockSearchService {
    fn default() -> Self {
        Self::empty()
    }
}

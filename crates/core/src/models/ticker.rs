/// Regional exchange suffixes that Yahoo Finance appends to Korean tickers
/// (KOSPI and KOSDAQ). Trades recorded with and without them are the same
/// instrument.
pub const REGIONAL_SUFFIXES: [&str; 2] = [".KS", ".KQ"];

/// Normalize a ticker for grouping and quote matching.
///
/// Trims, uppercases, and strips one trailing `.KS` / `.KQ` suffix, so
/// `"005930.ks"`, `"005930.KQ"` and `"005930"` all become `"005930"`.
/// Idempotent.
pub fn normalize_ticker(ticker: &str) -> String {
    let upper = ticker.trim().to_uppercase();
    for suffix in REGIONAL_SUFFIXES {
        if let Some(stripped) = upper.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    upper
}

/// True if the ticker already carries a regional suffix.
pub fn has_regional_suffix(ticker: &str) -> bool {
    let upper = ticker.trim().to_uppercase();
    REGIONAL_SUFFIXES.iter().any(|s| upper.ends_with(s))
}

/// Candidate symbols to try against a quote source, in order:
/// the bare ticker, then `.KS`, then `.KQ`.
///
/// A ticker that already has a suffix, or that contains characters
/// marking it as a non-Korean symbol (`-`, `=`, `^`), yields only itself.
pub fn regional_candidates(ticker: &str) -> Vec<String> {
    let upper = ticker.trim().to_uppercase();
    if has_regional_suffix(&upper) || upper.contains(['-', '=', '^']) {
        return vec![upper];
    }
    let mut candidates = Vec::with_capacity(1 + REGIONAL_SUFFIXES.len());
    candidates.push(upper.clone());
    candidates.extend(REGIONAL_SUFFIXES.iter().map(|s| format!("{upper}{s}")));
    candidates
}

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    // CoinGecko coin ids for the crypto tickers we can chart without the backend.
    static ref COIN_IDS: HashMap<&'static str, &'static str> = HashMap::from([
        ("btc", "bitcoin"),
        ("eth", "ethereum"),
        ("sol", "solana"),
        ("link", "chainlink"),
        ("xrp", "ripple"),
        ("doge", "dogecoin"),
        ("ada", "cardano"),
        ("shib", "shiba-inu"),
    ]);
}

fn normalize(ticker: &str) -> String {
    ticker
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Maps a ticker such as `$BTC` to its price-provider coin id.
/// `None` means no fallback chart is available for it.
pub fn resolve(ticker: &str) -> Option<&'static str> {
    COIN_IDS.get(normalize(ticker).as_str()).copied()
}

pub fn supported_symbols() -> Vec<&'static str> {
    let mut symbols: Vec<&'static str> = COIN_IDS.keys().copied().collect();
    symbols.sort_unstable();
    symbols
}

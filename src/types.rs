use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub title: String,
    pub timestamp: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub spike_tickers: Vec<String>,
}

impl Signal {
    /// Two signals with the same identity are duplicates, whatever else differs.
    pub fn identity(&self) -> String {
        format!("{}-{}", self.title, self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: String,
    pub price: f64,
}

pub type ChartSeries = Vec<ChartPoint>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub logs: Vec<String>,
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub charts: HashMap<String, ChartSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// CoinGecko `market_chart` payload; each entry is `[epoch_ms, price]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub logs: usize,
    pub new_signals: usize,
    pub backend_charts: usize,
    pub fallback_charts: Vec<String>,
    pub unsupported_tickers: Vec<String>,
    pub failed_tickers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_response_without_charts_is_empty_map() {
        let raw = r#"{"logs":["started"],"signals":[{"title":"A","timestamp":"t1","summary":"s","sentiment":"Bullish","sources":[]}]}"#;
        let resp: ScanResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.charts.is_empty());
        assert!(resp.signals[0].spike_tickers.is_empty());
        assert_eq!(resp.signals[0].identity(), "A-t1");
    }

    #[test]
    fn market_chart_pairs_deserialize() {
        let raw = r#"{"prices":[[0,50000.0],[3600000,50500.5]],"market_caps":[]}"#;
        let resp: MarketChartResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.prices, vec![(0.0, 50000.0), (3_600_000.0, 50500.5)]);
    }
}

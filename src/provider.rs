use crate::error::{FinviewError, Result};
use crate::types::MarketChartResponse;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Quote currency and window of every fallback chart.
pub const VS_CURRENCY: &str = "usd";
pub const CHART_DAYS: u32 = 1;

/// Source of fallback price series, keyed by provider coin id.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Raw `(epoch_ms, price)` pairs in provider order.
    async fn market_chart(&self, coin_id: &str) -> Result<Vec<(f64, f64)>>;
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    url: String,
}

impl CoinGeckoClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoClient {
    async fn market_chart(&self, coin_id: &str) -> Result<Vec<(f64, f64)>> {
        let days = CHART_DAYS.to_string();
        let response = self
            .client
            .get(format!("{}/coins/{}/market_chart", self.url, coin_id))
            .query(&[("vs_currency", VS_CURRENCY), ("days", days.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FinviewError::fallback(coin_id, e))?;

        let body: MarketChartResponse = response
            .json()
            .await
            .map_err(|e| FinviewError::fallback(coin_id, e))?;

        debug!("[CoinGecko] {}: {} price point(s)", coin_id, body.prices.len());
        Ok(body.prices)
    }
}

use crate::charts::ChartStore;
use crate::types::{ChartSeries, Signal};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChartPanel {
    Available { points: ChartSeries },
    /// Unsupported ticker, failed fetch, or empty series.
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickerChart {
    pub ticker: String,
    #[serde(flatten)]
    pub panel: ChartPanel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalCard {
    #[serde(flatten)]
    pub signal: Signal,
    pub charts: Vec<TickerChart>,
}

/// Everything the dashboard needs to draw the current cycle.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub loading: bool,
    pub logs: Vec<String>,
    pub signals: Vec<SignalCard>,
    pub last_error: Option<String>,
    pub scanned_at: Option<i64>,
}

impl SignalCard {
    pub fn build(signal: &Signal, charts: &ChartStore) -> Self {
        let charts = signal
            .spike_tickers
            .iter()
            .map(|ticker| TickerChart {
                ticker: ticker.clone(),
                panel: match charts.get(ticker) {
                    Some(points) if !points.is_empty() => ChartPanel::Available {
                        points: points.clone(),
                    },
                    _ => ChartPanel::Unavailable,
                },
            })
            .collect();

        Self {
            signal: signal.clone(),
            charts,
        }
    }
}

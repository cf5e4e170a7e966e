use crate::error::{FinviewError, Result};
use crate::types::{ChartPoint, ChartSeries};
use chrono::{FixedOffset, TimeZone};
use std::collections::HashMap;

/// Per-ticker price series for the current cycle.
///
/// Backend series are installed verbatim and always win; a fallback series is
/// only accepted for a ticker that has no non-empty series yet.
#[derive(Debug, Clone, Default)]
pub struct ChartStore {
    series: HashMap<String, ChartSeries>,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.series.clear();
    }

    pub fn adopt_backend(&mut self, charts: HashMap<String, ChartSeries>) {
        self.series.extend(charts);
    }

    /// Returns whether the series was installed.
    pub fn adopt_fallback(&mut self, ticker: &str, series: ChartSeries) -> bool {
        if self.has_data(ticker) {
            return false;
        }
        self.series.insert(ticker.to_string(), series);
        true
    }

    pub fn has_data(&self, ticker: &str) -> bool {
        self.series.get(ticker).is_some_and(|s| !s.is_empty())
    }

    pub fn get(&self, ticker: &str) -> Option<&ChartSeries> {
        self.series.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Zero-padded `HH:MM` for an epoch-millisecond timestamp in `offset`.
pub fn format_chart_time(epoch_ms: f64, offset: &FixedOffset) -> Option<String> {
    if !epoch_ms.is_finite() {
        return None;
    }
    offset
        .timestamp_millis_opt(epoch_ms.round() as i64)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
}

/// Builds a chart series from raw `(epoch_ms, price)` pairs, keeping their order.
/// One bad timestamp rejects the whole payload.
pub fn fallback_series(coin: &str, prices: &[(f64, f64)], offset: &FixedOffset) -> Result<ChartSeries> {
    prices
        .iter()
        .map(|&(ts, price)| {
            let time = format_chart_time(ts, offset)
                .ok_or_else(|| FinviewError::fallback(coin, format!("invalid timestamp {ts}")))?;
            Ok(ChartPoint { time, price })
        })
        .collect()
}
